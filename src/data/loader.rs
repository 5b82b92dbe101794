use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::model::{Row, Table};

/// Columns whose upper-cased name contains one of these markers are logged in
/// tenths and get rescaled to their real unit on load.
const SCALED_COLUMN_MARKERS: [&str; 3] = ["VOLTAGE", "VFD_RUNNING_FRQ", "VFD_CURRENT"];

/// Cell spellings that mean "no value" (compared case-insensitively).
const NULL_TOKENS: [&str; 3] = ["null", "undefined", "n/a"];

/// The longest leading number of a reading, e.g. `415.0` in `415.0V`.
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("leading number pattern is valid")
});

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("'{}' is not a CSV file", .0.display())]
    NotCsv(PathBuf),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to split CSV records")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a `.csv` file on disk.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(LoadError::NotCsv(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&String::from_utf8_lossy(&bytes))
}

/// Parse raw CSV text into headers and normalized rows.
///
/// This is a tolerant, line-oriented split on commas (no quoting support):
///
/// * blank lines are skipped; the first remaining line holds the headers,
///   with empty header cells (e.g. from a trailing comma) discarded;
/// * every cell is trimmed and null spellings become the empty string;
/// * trailing empty cells are stripped while the row is wider than the
///   header set;
/// * a row is kept only with exactly as many cells as headers, or one fewer;
///   anything else is silently dropped;
/// * values in scaled columns are divided by ten, two decimals.
pub fn parse(text: &str) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = loop {
        match records.next() {
            Some(result) => {
                let record = result?;
                if is_blank(&record) {
                    continue;
                }
                break record
                    .iter()
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            None => return Ok(Table::default()),
        }
    };

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for result in records {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let fields: Vec<String> = record.iter().map(normalize_value).collect();
        match assemble_row(&headers, fields) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!(
            "dropped {dropped} row(s) whose width did not match {} header(s)",
            headers.len()
        );
    }
    Ok(Table::new(headers, rows))
}

// ---------------------------------------------------------------------------
// Cell normalization
// ---------------------------------------------------------------------------

/// Trim a raw cell and map the usual "no value" spellings to `""`.
pub fn normalize_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let is_null = trimmed.is_empty()
        || trimmed == "-"
        || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t));
    if is_null {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Whether values of this column are stored in tenths.
pub fn is_scaled_column(header: &str) -> bool {
    let upper = header.to_uppercase();
    SCALED_COLUMN_MARKERS.iter().any(|m| upper.contains(m))
}

/// Divide the leading number of a value by ten and render it with two
/// decimals (`"12V"` becomes `"1.20"`). Values without a leading number come
/// back unchanged.
pub fn scale_value(value: &str) -> String {
    let Some(n) = leading_number(value) else {
        return value.to_string();
    };
    let scaled = n / 10.0;
    if scaled.is_infinite() {
        let sign = if scaled < 0.0 { "-" } else { "" };
        return format!("{sign}Infinity");
    }
    to_fixed_2(scaled)
}

fn leading_number(value: &str) -> Option<f64> {
    let m = LEADING_NUMBER.find(value.trim_start())?;
    m.as_str().parse::<f64>().ok()
}

/// Two-decimal rendering where an exact halfway value rounds its magnitude
/// up (`0.125` → `0.13`, `-0.125` → `-0.13`).
fn to_fixed_2(x: f64) -> String {
    // avoid rendering "-0.00" for negative zero
    let x = if x == 0.0 { 0.0 } else { x };
    let magnitude = x.abs();

    // A binary double sits exactly halfway between two cents only when it is
    // an odd number of eighths.
    let eighths = magnitude * 8.0;
    let is_tie = eighths.fract() == 0.0 && eighths % 2.0 == 1.0;
    if !is_tie || magnitude >= 1e15 {
        return format!("{x:.2}");
    }

    let cents = (magnitude * 100.0).ceil() as u64;
    let sign = if x < 0.0 { "-" } else { "" };
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

// -- helpers --

/// A line holding nothing but whitespace arrives as one blank field.
fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record[0].trim().is_empty()
}

fn assemble_row(headers: &[String], mut fields: Vec<String>) -> Option<Row> {
    while fields.len() > headers.len() && fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }
    if fields.len() != headers.len() && fields.len() + 1 != headers.len() {
        return None;
    }

    for (header, value) in headers.iter().zip(fields.iter_mut()) {
        if !value.is_empty() && is_scaled_column(header) {
            *value = scale_value(value);
        }
    }
    Some(Row::padded(fields, headers.len()))
}
