use std::path::PathBuf;

use log::{info, warn};

use crate::config::{RunConfig, VariableConfig};
use crate::data::slice::{load_and_slice, LoadOptions};
use crate::data::stats::{format_summary, summarize};
use crate::error::Result;
use crate::render::grid::{render_grid, AxisLabels};
use crate::render::output::ensure_folder;
use crate::render::style::StyleKind;

/// How a run ended. An empty window is an outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Rendered { path: PathBuf, rows: usize },
    NoData { available_rows: usize },
}

/// Load, slice, render and report, as configured.
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    config.validate()?;
    let folder = ensure_folder(&config.save_folder())?;

    let options = LoadOptions {
        encoding: config.encoding.clone(),
        max_row_position: config.max_row_position,
        missing: config.missing_columns,
    };
    let prepared = load_and_slice(
        &config.input,
        &config.variables.keys(),
        config.window,
        &options,
    )?;

    // Only the columns that were found get panels and X numbers.
    let present: Vec<String> = prepared
        .table
        .column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let variables = config.variables.retain_keys(&present);

    println!("{}", variable_table(&variables));

    if prepared.table.is_empty() {
        warn!(
            "no rows in window [{}, {}]; rows after filtering: 0..{}",
            config.window.start, config.window.end, prepared.available_rows
        );
        println!("no data in the requested window, nothing rendered");
        return Ok(RunOutcome::NoData {
            available_rows: prepared.available_rows,
        });
    }

    info!("rendering {} panels", variables.len());
    // The Chinese style keeps the original headers and titles each panel.
    let (table, labels) = match config.style {
        StyleKind::English => (
            prepared.table.renamed(&variables.english_names())?,
            variables.legend_labels(),
        ),
        StyleKind::Chinese => (prepared.table.clone(), variables.stats_labels_cn()),
    };
    let path = render_grid(
        &table,
        &labels,
        &config.title,
        &AxisLabels::new(&config.x_label, &config.y_label),
        &folder.join(&config.file_name),
        &config.style.config(),
    )?;
    println!("figure saved: {}", path.display());

    if let Some(summary) = summarize(&prepared.table) {
        println!("\n目标区间数据基本统计信息 (中文):");
        println!("{}", format_summary(&summary, &variables.stats_labels_cn())?);
        println!("\nBasic statistical information (English):");
        println!("{}", format_summary(&summary, &variables.stats_labels_en())?);
    }

    Ok(RunOutcome::Rendered {
        path,
        rows: prepared.table.len(),
    })
}

/// Index / key / English name / unit listing of the plotted variables.
pub fn variable_table(variables: &VariableConfig) -> String {
    let mut out = format!("{:<6}{:<20}{:<46}{}\n", "No.", "Key", "Name", "Unit");
    out.push_str(&"-".repeat(80));
    for (i, v) in variables.iter().enumerate() {
        out.push_str(&format!(
            "\n{:<6}{:<20}{:<46}{}",
            format!("X{}", i + 1),
            v.key,
            v.name,
            v.unit
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariableSpec;
    use crate::data::slice::{MissingColumns, RowWindow};
    use crate::error::Error;

    fn write_csv(dir: &std::path::Path, rows: usize) -> PathBuf {
        let mut text = String::from("时间,窑尾负压,三次风温\n");
        for r in 0..rows {
            text.push_str(&format!("t{r},{},{}\n", -100.0 - r as f64, 900 + r));
        }
        let (bytes, _, _) = encoding_rs::GBK.encode(&text);
        let path = dir.join("data.csv");
        std::fs::write(&path, &bytes).unwrap();
        path
    }

    fn config(dir: &std::path::Path, window: RowWindow) -> RunConfig {
        RunConfig {
            input: write_csv(dir, 40),
            base_dir: dir.to_path_buf(),
            folder_name: "out".to_string(),
            window,
            variables: VariableConfig::new(vec![
                VariableSpec::new("窑尾负压", "Kiln Outlet Negative Pressure", "Pa"),
                VariableSpec::new("三次风温", "Tertiary Air Temperature", "℃"),
            ]),
            ..RunConfig::default()
        }
    }

    fn pngs_in(folder: &std::path::Path) -> usize {
        std::fs::read_dir(folder)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .path()
                    .extension()
                    .is_some_and(|x| x == "png")
            })
            .count()
    }

    #[test]
    fn test_empty_window_skips_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), RowWindow::new(1_000_000, 1_000_010));

        let outcome = run(&config).unwrap();
        assert_eq!(outcome, RunOutcome::NoData { available_rows: 40 });

        let folder = config.save_folder();
        assert!(folder.is_dir());
        assert_eq!(pngs_in(&folder), 0);
    }

    #[test]
    fn test_missing_column_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), RowWindow::new(0, 9));
        config.variables = VariableConfig::new(vec![
            VariableSpec::new("窑尾负压", "Kiln Outlet Negative Pressure", "Pa"),
            VariableSpec::new("f_CaO", "f_CaO Content", "%"),
        ]);

        match run(&config) {
            Err(Error::MissingColumns(missing)) => assert_eq!(missing, vec!["f_CaO".to_string()]),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_warn_then_empty_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), RowWindow::new(50, 60));
        config.missing_columns = MissingColumns::Warn;
        config.variables = VariableConfig::new(vec![
            VariableSpec::new("f_CaO", "f_CaO Content", "%"),
            VariableSpec::new("三次风温", "Tertiary Air Temperature", "℃"),
        ]);

        let outcome = run(&config).unwrap();
        assert_eq!(outcome, RunOutcome::NoData { available_rows: 40 });
    }

    #[test]
    fn test_unreadable_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), RowWindow::new(0, 9));
        config.input = dir.path().join("absent.csv");
        assert!(matches!(run(&config), Err(Error::Io { .. })));
    }

    #[test]
    fn test_variable_table_lists_every_variable() {
        let table = variable_table(&VariableConfig::cement_calcination());
        assert!(table.contains("X1"));
        assert!(table.contains("X20"));
        assert!(table.contains("Tertiary Air Temperature"));
        assert_eq!(table.lines().count(), 22);
    }

    #[test]
    fn test_valid_window_renders_and_reports_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), RowWindow::new(5, 34));

        let first = run(&config).unwrap();
        let first_path = match &first {
            RunOutcome::Rendered { path, rows } => {
                assert_eq!(*rows, 30);
                assert!(path.exists());
                assert!(path.starts_with(config.save_folder()));
                path.clone()
            }
            other => panic!("unexpected outcome: {other:?}"),
        };
        let first_bytes = std::fs::read(&first_path).unwrap();

        match run(&config).unwrap() {
            RunOutcome::Rendered { path, rows } => {
                assert_eq!(rows, 30);
                assert_ne!(path, first_path);
                assert!(path.exists());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(std::fs::read(&first_path).unwrap(), first_bytes);
        assert_eq!(pngs_in(&config.save_folder()), 2);
    }
}
