use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, info};

use super::model::RawTable;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited text file decoded with the given `encoding_rs` label
/// (`"gbk"`, `"utf-8"`, …). Dispatch on extension picks the delimiter.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma separated, header row first
/// * `.tsv`          – tab separated, header row first
pub fn load_file(path: &Path, encoding: &str) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" | "txt" => b',',
        "tsv" => b'\t',
        other => {
            return Err(Error::Config(format!(
                "unsupported file extension: .{other}"
            )))
        }
    };

    let text = read_encoded(path, encoding)?;
    let table = parse_delimited(&text, delimiter)?;
    info!(
        "read {} ({} rows × {} columns)",
        path.display(),
        table.len(),
        table.headers.len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Read the whole file and decode it. A byte sequence that is invalid in the
/// declared encoding is an error, never a silent replacement character.
pub fn read_encoded(path: &Path, encoding: &str) -> Result<String> {
    let encoding = Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(encoding.to_string()))?;

    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(Error::Decode {
            path: path.to_path_buf(),
            encoding: used.name(),
        });
    }
    debug!("decoded {} bytes as {}", bytes.len(), used.name());
    Ok(text.into_owned())
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse header row plus records. Ragged rows are rejected by the CSV
/// reader as malformed input.
fn parse_delimited(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(RawTable { headers, records })
}
