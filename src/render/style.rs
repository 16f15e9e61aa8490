use serde::{Deserialize, Serialize};

/// Which built-in style a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    #[default]
    English,
    Chinese,
}

impl StyleKind {
    pub fn config(self) -> StyleConfig {
        match self {
            StyleKind::English => StyleConfig::english(),
            StyleKind::Chinese => StyleConfig::chinese(),
        }
    }
}

/// Every visual knob of the grid figure. Passed explicitly to the renderer;
/// nothing is read from global state.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub font_family: String,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub tick_font_size: u32,
    pub legend_font_size: u32,
    /// Gap between plot and legend, as a fraction of the plot width.
    pub legend_anchor_offset: f64,
    /// Share of each cell's width reserved for the legend strip.
    pub legend_fraction: f64,
    pub show_subplot_titles: bool,
    pub line_width: u32,
    pub grid_line_width: u32,
    /// Figure size in inches.
    pub width_in: f64,
    pub height_in: f64,
    /// 150 rather than 300: the full 22 × 32 in figure at 300 dpi needs an
    /// RGB buffer of about 190 MB before cropping.
    pub dpi: u32,
    /// Whitespace kept around the tight crop, in inches.
    pub pad_in: f64,
}

impl StyleConfig {
    /// Serif fonts, wide figure so long legends fit, no subplot titles.
    pub fn english() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            title_font_size: 18,
            label_font_size: 12,
            tick_font_size: 11,
            legend_font_size: 11,
            legend_anchor_offset: 0.02,
            legend_fraction: 0.30,
            show_subplot_titles: false,
            line_width: 2,
            grid_line_width: 1,
            width_in: 22.0,
            height_in: 32.0,
            dpi: 150,
            pad_in: 0.2,
        }
    }

    /// CJK-capable fonts and a title above every panel.
    pub fn chinese() -> Self {
        Self {
            font_family: "SimHei".to_string(),
            title_font_size: 18,
            label_font_size: 11,
            tick_font_size: 10,
            legend_font_size: 10,
            legend_anchor_offset: 0.01,
            legend_fraction: 0.24,
            show_subplot_titles: true,
            line_width: 2,
            grid_line_width: 1,
            width_in: 19.0,
            height_in: 32.0,
            dpi: 150,
            pad_in: 0.2,
        }
    }

    /// Figure size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    /// Point size → pixels at the figure dpi.
    pub fn px(&self, points: u32) -> u32 {
        ((points as f64) * self.dpi as f64 / 72.0).round().max(1.0) as u32
    }

    pub fn pad_px(&self) -> u32 {
        (self.pad_in * self.dpi as f64).round() as u32
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::english()
    }
}

/// Subplot title text: the label up to its first `" ("`.
pub fn subplot_title(label: &str) -> &str {
    label.split(" (").next().unwrap_or(label)
}
