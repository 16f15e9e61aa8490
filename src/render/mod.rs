/// Rendering layer: the grid figure and everything it needs.
///
/// * `layout` – grid geometry and axis ranges (pure)
/// * `style`  – explicit style configuration, no global state
/// * `grid`   – plotters drawing of panels and legends
/// * `output` – collision-free destination, tight crop, PNG encode

pub mod grid;
pub mod layout;
pub mod output;
pub mod style;
