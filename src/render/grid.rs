use std::path::{Path, PathBuf};

use chrono::Local;
use image::RgbImage;
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::TRANSPARENT;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::layout::{x_range_for, y_range_for, GridLayout};
use super::output::{ensure_folder, resolve_destination, save_cropped_png};
use super::style::{subplot_title, StyleConfig};
use crate::color::panel_color;
use crate::data::model::{Column, Table};
use crate::error::{Error, Result};

/// X and Y axis descriptions shared by every panel.
#[derive(Debug, Clone)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

impl AxisLabels {
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

/// Font at `points` size in the style's family, scaled to the figure dpi.
fn font_desc(style: &StyleConfig, points: u32, weight: FontStyle) -> FontDesc<'_> {
    FontDesc::new(
        FontFamily::Name(style.font_family.as_str()),
        style.px(points) as f64,
        weight,
    )
}

fn blank_tick(_: &f64) -> String {
    String::new()
}

fn integer_tick(v: &f64) -> String {
    format!("{v:.0}")
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Draw one line panel per column into a single PNG and return the path
/// actually written (renamed with a timestamp if `destination` exists).
///
/// Panel `i` sits in grid cell `(i / 2, i % 2)` and uses palette colour `i`.
/// Each legend sits in a strip right of its plot so it never covers the
/// curve. Only the bottom row carries X tick labels.
pub fn render_grid(
    table: &Table,
    labels: &[String],
    title: &str,
    axis: &AxisLabels,
    destination: &Path,
    style: &StyleConfig,
) -> Result<PathBuf> {
    if table.is_empty() {
        return Err(Error::NothingToRender);
    }
    if labels.len() != table.n_columns() {
        return Err(Error::LabelMismatch {
            expected: table.n_columns(),
            actual: labels.len(),
        });
    }
    let layout = GridLayout::for_panels(table.n_columns())?;
    debug!(
        "grid {}×{} for {} panels, {} rows each",
        layout.rows,
        layout.cols,
        layout.panels,
        table.len()
    );

    let (width, height) = style.pixel_size();
    let mut buffer = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, table, labels, title, axis, layout, style)?;
        root.present().map_err(render_err)?;
    }

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| Error::Render("bitmap buffer has the wrong size".to_string()))?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_folder(parent)?;
    }
    let path = resolve_destination(destination, Local::now());
    save_cropped_png(&image, &path, style.pad_px())?;
    info!("grid saved: {}", path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Figure / panel drawing
// ---------------------------------------------------------------------------

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &Table,
    labels: &[String],
    title: &str,
    axis: &AxisLabels,
    layout: GridLayout,
    style: &StyleConfig,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let body = root
        .titled(title, font_desc(style, style.title_font_size, FontStyle::Bold))
        .map_err(render_err)?;
    let margin = style.px(8) as i32;
    let body = body.margin(margin, margin, margin, margin);

    let cells = body.split_evenly((layout.rows, layout.cols));
    let x_range = x_range_for(table.len());

    for (index, (column, label)) in table.columns().iter().zip(labels).enumerate() {
        let cell = &cells[index];
        let (cell_w, _) = cell.dim_in_pixel();
        let plot_w = ((cell_w as f64) * (1.0 - style.legend_fraction)).round() as u32;
        let (plot_area, legend_area) = cell.split_horizontally(plot_w as i32);

        let color = panel_color(index);
        draw_panel(
            &plot_area,
            column,
            label,
            axis,
            x_range,
            layout.shows_x_axis(index),
            color,
            style,
        )?;

        let gap = ((plot_w as f64) * style.legend_anchor_offset).round() as i32;
        draw_legend(&legend_area, gap, label, color, style)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    column: &Column,
    label: &str,
    axis: &AxisLabels,
    x_range: (f64, f64),
    shows_x_axis: bool,
    color: RGBColor,
    style: &StyleConfig,
) -> Result<()> {
    let label_font = || font_desc(style, style.label_font_size, FontStyle::Normal);
    let tick_font = font_desc(style, style.tick_font_size, FontStyle::Normal);
    let (y_min, y_max) = y_range_for(column.finite_range());

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(style.px(4) as i32)
        .y_label_area_size(style.px(56) as i32)
        .x_label_area_size(if shows_x_axis {
            style.px(40) as i32
        } else {
            style.px(4) as i32
        });
    if style.show_subplot_titles {
        builder.caption(subplot_title(label), label_font());
    }

    let mut chart = builder
        .build_cartesian_2d(x_range.0..x_range.1, y_min..y_max)
        .map_err(render_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(axis.y.as_str())
        .label_style(tick_font)
        .axis_desc_style(label_font())
        .bold_line_style(BLACK.mix(0.3).stroke_width(style.grid_line_width))
        .light_line_style(TRANSPARENT)
        .y_labels(5)
        .x_labels(10);
    if shows_x_axis {
        mesh.x_desc(axis.x.as_str()).x_label_formatter(&integer_tick);
    } else {
        mesh.x_label_formatter(&blank_tick);
    }
    mesh.draw().map_err(render_err)?;

    let line_style = color.mix(0.9).stroke_width(style.line_width);
    for segment in finite_segments(&column.values) {
        chart
            .draw_series(LineSeries::new(segment, line_style))
            .map_err(render_err)?;
    }
    Ok(())
}

/// Framed legend box: colour swatch plus label, vertically centred in
/// `area` and `gap` pixels from its left edge.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    gap: i32,
    label: &str,
    color: RGBColor,
    style: &StyleConfig,
) -> Result<()> {
    let (_, area_h) = area.dim_in_pixel();
    let font_px = style.px(style.legend_font_size);
    let text_style =
        TextStyle::from(font_desc(style, style.legend_font_size, FontStyle::Normal)).color(&BLACK);
    let (text_w, text_h) = area
        .estimate_text_size(label, &text_style)
        .map_err(render_err)?;

    let pad = (font_px / 3) as i32;
    let handle = (font_px as f64 * 1.2).round() as i32;
    let spacing = (font_px / 2) as i32;
    let box_w = pad + handle + spacing + text_w as i32 + pad;
    let box_h = text_h as i32 + 2 * pad;

    let x0 = gap;
    let y0 = area_h as i32 / 2 - box_h / 2;
    let mid = y0 + box_h / 2;
    let corners = [(x0, y0), (x0 + box_w, y0 + box_h)];

    area.draw(&Rectangle::new(corners, WHITE.mix(0.95).filled()))
        .map_err(render_err)?;
    area.draw(&Rectangle::new(corners, BLACK.mix(0.4).stroke_width(1)))
        .map_err(render_err)?;
    area.draw(&PathElement::new(
        vec![(x0 + pad, mid), (x0 + pad + handle, mid)],
        color.stroke_width(style.line_width),
    ))
    .map_err(render_err)?;
    area.draw(&Text::new(
        label.to_string(),
        (x0 + pad + handle + spacing, mid - text_h as i32 / 2),
        text_style,
    ))
    .map_err(render_err)?;
    Ok(())
}

/// `(row position, value)` runs split wherever a sample is NaN.
pub fn finite_segments(values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push((i as f64, v));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_segments_split_on_nan() {
        let segments = finite_segments(&[1.0, 2.0, f64::NAN, f64::NAN, 5.0, f64::NAN]);
        assert_eq!(segments, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(4.0, 5.0)]]);
        assert!(finite_segments(&[f64::NAN]).is_empty());
    }

    #[test]
    fn test_empty_table_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("grid.png");
        let table = Table::new(vec![Column::new("A", vec![])]).unwrap();

        let result = render_grid(
            &table,
            &["A".to_string()],
            "title",
            &AxisLabels::new("x", "y"),
            &dest,
            &StyleConfig::english(),
        );
        assert!(matches!(result, Err(Error::NothingToRender)));
        assert!(!dest.exists());
    }

    #[test]
    fn test_label_count_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("grid.png");
        let table = Table::new(vec![Column::new("A", vec![1.0, 2.0])]).unwrap();

        let result = render_grid(
            &table,
            &[],
            "title",
            &AxisLabels::new("x", "y"),
            &dest,
            &StyleConfig::english(),
        );
        assert!(matches!(
            result,
            Err(Error::LabelMismatch { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_more_than_twenty_panels_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("grid.png");
        let columns = (0..21)
            .map(|i| Column::new(format!("c{i}"), vec![1.0, 2.0]))
            .collect();
        let table = Table::new(columns).unwrap();
        let labels: Vec<String> = (0..21).map(|i| format!("c{i}")).collect();

        let result = render_grid(
            &table,
            &labels,
            "title",
            &AxisLabels::new("x", "y"),
            &dest,
            &StyleConfig::english(),
        );
        assert!(matches!(result, Err(Error::TooManyPanels { count: 21, .. })));
        assert!(!dest.exists());
    }

    fn small_style() -> StyleConfig {
        StyleConfig {
            width_in: 10.0,
            height_in: 8.0,
            dpi: 72,
            ..StyleConfig::english()
        }
    }

    /// `stem_YYYYmmdd_HHMM.png` for the given stem.
    fn is_stamped(path: &Path, stem: &str) -> bool {
        let name = path.file_name().unwrap().to_str().unwrap();
        let Some(stamp) = name
            .strip_prefix(stem)
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix(".png"))
        else {
            return false;
        };
        match stamp.split_once('_') {
            Some((date, time)) => {
                date.len() == 8
                    && time.len() == 4
                    && date.chars().chain(time.chars()).all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    #[test]
    fn test_render_writes_png_and_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("figures").join("grid.png");
        let table = Table::new(vec![
            Column::new("A", vec![1.0, 3.0, 2.0, 5.0, 4.0]),
            Column::new("B", vec![7.0; 5]),
            Column::new("C", vec![-1.0, f64::NAN, -3.0, -2.0, -4.0]),
        ])
        .unwrap();
        let labels: Vec<String> = ["X1: A [u]", "X2: B [u]", "X3: C [u]"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let axis = AxisLabels::new("Sample", "Value");
        let style = small_style();

        let first = render_grid(&table, &labels, "title", &axis, &dest, &style).unwrap();
        assert_eq!(first, dest);
        assert!(first.exists());
        let decoded = image::open(&first).unwrap();
        assert!(decoded.width() > 0 && decoded.width() <= 720);
        assert!(decoded.height() > 0 && decoded.height() <= 576);
        let first_bytes = std::fs::read(&first).unwrap();

        let second = render_grid(&table, &labels, "title", &axis, &dest, &style).unwrap();
        assert_ne!(second, first);
        assert!(second.exists());
        assert!(is_stamped(&second, "grid"), "{}", second.display());
        assert!(image::open(&second).is_ok());
        assert_eq!(std::fs::read(&first).unwrap(), first_bytes);
    }
}
