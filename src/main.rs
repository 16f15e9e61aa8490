use std::path::Path;

use anyhow::{Context, Result};
use sensor_grid::config::RunConfig;
use sensor_grid::pipeline::{run, RunOutcome};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional JSON file overriding the built-in run settings.
    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_json_file(Path::new(&path))
            .with_context(|| format!("loading config {path}"))?,
        None => RunConfig::default(),
    };

    let outcome = run(&config)
        .with_context(|| format!("processing {}", config.input.display()))?;

    match outcome {
        RunOutcome::Rendered { path, rows } => {
            log::info!("done: {rows} rows plotted to {}", path.display());
        }
        RunOutcome::NoData { available_rows } => {
            log::warn!("done without a figure: window outside rows 0..{available_rows}");
        }
    }
    Ok(())
}
