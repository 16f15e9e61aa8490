use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use sensor_grid::config::VariableConfig;

/// splitmix64 stream; the same seed always yields the same sample file.
struct Noise(u64);

impl Noise {
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Roughly normal with unit variance: sum of twelve uniforms minus six.
    fn jitter(&mut self) -> f64 {
        (0..12).map(|_| self.unit()).sum::<f64>() - 6.0
    }
}

const ROWS: usize = 46_000;
/// Rows (0-based) where the synthetic disturbance happens.
const EVENT: std::ops::Range<usize> = 44_300..44_450;

fn main() -> Result<()> {
    let mut noise = Noise(42);
    let variables = VariableConfig::cement_calcination();
    let start = NaiveDate::from_ymd_opt(2021, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building start time")?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["时间".to_string()];
    header.extend(variables.keys());
    writer.write_record(&header)?;

    // Each variable random-walks around its own level; the event shifts it.
    let mut levels: Vec<f64> = (0..variables.len())
        .map(|i| 10.0 * (i as f64 + 1.0))
        .collect();

    for row in 0..ROWS {
        let stamp = start + Duration::minutes(row as i64);
        let mut record = vec![stamp.format("%Y-%m-%d %H:%M:%S").to_string()];
        for (i, level) in levels.iter_mut().enumerate() {
            let base = 10.0 * (i as f64 + 1.0);
            *level += 0.02 * base.sqrt() * noise.jitter() + 0.01 * (base - *level);
            let shift = if EVENT.contains(&row) { 0.1 * base } else { 0.0 };
            record.push(format!("{:.3}", *level + shift));
        }
        writer.write_record(&record)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))?;
    let text = String::from_utf8(buffer)?;
    let (bytes, _, unmappable) = encoding_rs::GBK.encode(&text);
    if unmappable {
        anyhow::bail!("sample text has characters GBK cannot encode");
    }

    let output_path = "CementCalcinationProcessData.csv";
    std::fs::write(output_path, &bytes).with_context(|| format!("writing {output_path}"))?;

    println!(
        "Wrote {ROWS} rows × {} variables (GBK) to {output_path}",
        variables.len()
    );
    Ok(())
}
