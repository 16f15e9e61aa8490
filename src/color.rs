use log::warn;
use palette::Srgb;
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Panel colour palette
// ---------------------------------------------------------------------------

/// Twenty distinct line colours, one per grid panel.
pub const PANEL_COLORS: [&str; 20] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94",
    "#f7b6d3", "#c7c7c7", "#dbdb8d", "#9edae5",
];

/// Parse `#rrggbb` (with or without `#`).
pub fn parse_hex(hex: &str) -> Option<RGBColor> {
    let rgb: Srgb<u8> = hex.trim().trim_start_matches('#').parse().ok()?;
    Some(RGBColor(rgb.red, rgb.green, rgb.blue))
}

/// Colour for panel `index`; wraps around the palette.
pub fn panel_color(index: usize) -> RGBColor {
    let hex = PANEL_COLORS[index % PANEL_COLORS.len()];
    parse_hex(hex).unwrap_or_else(|| {
        warn!("bad palette entry {hex}, using grey");
        RGBColor(128, 128, 128)
    })
}
