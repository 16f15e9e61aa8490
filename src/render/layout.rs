use crate::error::{Error, Result};

/// Panels per grid row.
pub const GRID_COLUMNS: usize = 2;
/// Most grid rows drawn in one figure.
pub const MAX_GRID_ROWS: usize = 10;
/// Most panels one figure holds.
pub const MAX_PANELS: usize = GRID_COLUMNS * MAX_GRID_ROWS;

/// Relative Y padding on each side of a series.
pub const Y_MARGIN_RATIO: f64 = 0.08;
/// Absolute Y padding used when a series is constant.
pub const Y_FALLBACK_MARGIN: f64 = 0.15;

// ---------------------------------------------------------------------------
// Grid geometry
// ---------------------------------------------------------------------------

/// Row-major grid of `rows × cols` cells holding `panels` plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub panels: usize,
}

impl GridLayout {
    /// Two columns and as many rows as needed, up to [`MAX_PANELS`].
    pub fn for_panels(panels: usize) -> Result<Self> {
        if panels == 0 {
            return Err(Error::NothingToRender);
        }
        if panels > MAX_PANELS {
            return Err(Error::TooManyPanels {
                count: panels,
                max: MAX_PANELS,
            });
        }
        Ok(Self {
            rows: panels.div_ceil(GRID_COLUMNS),
            cols: GRID_COLUMNS,
            panels,
        })
    }

    /// `(row, col)` of panel `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Only the last grid row carries X tick labels and the X description.
    pub fn shows_x_axis(&self, index: usize) -> bool {
        self.cell(index).0 == self.rows - 1
    }
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Y range padded by 8 % of the span, or by a fixed amount for a constant
/// series so the range never has zero width.
pub fn padded_y_range(min: f64, max: f64) -> (f64, f64) {
    let margin = if max == min {
        Y_FALLBACK_MARGIN
    } else {
        (max - min) * Y_MARGIN_RATIO
    };
    (min - margin, max + margin)
}

/// Y range for a column's `(min, max)`; an all-NaN column centres on zero.
pub fn y_range_for(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        Some((min, max)) => padded_y_range(min, max),
        None => padded_y_range(0.0, 0.0),
    }
}

/// X range covering row positions `0..n_rows`; a single row gets unit width.
pub fn x_range_for(n_rows: usize) -> (f64, f64) {
    let last = n_rows.saturating_sub(1) as f64;
    if last == 0.0 {
        (-0.5, 0.5)
    } else {
        (0.0, last)
    }
}
