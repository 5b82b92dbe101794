use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::model::{Row, Table};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to download!")]
    NoRows,

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode CSV")]
    Csv(#[from] csv::Error),
}

/// Serialize `rows` of `table` back to CSV text.
///
/// The first line holds the headers; each row follows in header order.
/// Fields containing a comma, double quote or line break are quoted with
/// inner quotes doubled. Every line ends in `\n`.
pub fn serialize<'a>(
    table: &Table,
    rows: impl IntoIterator<Item = &'a Row>,
) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv_writer(&mut buf);
        write_rows(&mut writer, table, rows)?;
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `rows` to a CSV file, returning how many rows were written.
pub fn write_export<'a>(
    path: &Path,
    table: &Table,
    rows: impl IntoIterator<Item = &'a Row>,
) -> Result<usize, ExportError> {
    let rows: Vec<&Row> = rows.into_iter().collect();
    if rows.is_empty() {
        return Err(ExportError::NoRows);
    }

    let text = serialize(table, rows.iter().copied())?;
    std::fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("exported {} row(s) to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Download name for an export made at `now`, e.g.
/// `filtered_data_2024-06-15T08-30-00.csv`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("filtered_data_{}.csv", now.format("%Y-%m-%dT%H-%M-%S"))
}

// -- helpers --

fn csv_writer<W: io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn write_rows<'a, W: io::Write>(
    writer: &mut csv::Writer<W>,
    table: &Table,
    rows: impl IntoIterator<Item = &'a Row>,
) -> Result<(), csv::Error> {
    writer.write_record(&table.headers)?;
    for row in rows {
        writer.write_record(table.display_values(row))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use chrono::TimeZone;

    use super::*;
    use crate::data::loader::parse;

    fn unique_test_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("vfd-viewer-{prefix}-{nanos}"))
    }

    #[test]
    fn reproduces_normalized_values() {
        let text = "Date,Shift,VOLTAGE_RMS,Note,\n15/06/24,Night,1234,null\n16/06/24,Day,,ok\n";
        let table = parse(text).expect("parse should succeed");
        let text = serialize(&table, &table.rows).expect("serialize should succeed");
        assert_eq!(
            text,
            "Date,Shift,VOLTAGE_RMS,Note\n15/06/24,Night,123.40,\n16/06/24,Day,,ok\n"
        );
    }

    #[test]
    fn quotes_special_characters() {
        let table = Table::new(
            vec!["A".into(), "B".into()],
            vec![Row::padded(vec!["x,y".into(), "say \"hi\"".into()], 2)],
        );
        let text = serialize(&table, &table.rows).expect("serialize should succeed");
        assert_eq!(text, "A,B\n\"x,y\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn serializes_only_the_given_subset() {
        let table = parse("Id,Shift\na,Day\nb,Night\nc,Day\n").expect("parse should succeed");
        let subset = [&table.rows[0], &table.rows[2]];
        let text = serialize(&table, subset).expect("serialize should succeed");
        assert_eq!(text, "Id,Shift\na,Day\nc,Day\n");
    }

    #[test]
    fn names_export_after_utc_timestamp() {
        let now = Utc
            .with_ymd_and_hms(2024, 6, 15, 8, 30, 5)
            .single()
            .expect("valid timestamp");
        assert_eq!(export_file_name(now), "filtered_data_2024-06-15T08-30-05.csv");
    }

    #[test]
    fn write_export_refuses_empty_subset() {
        let table = parse("Id\n").expect("parse should succeed");
        let err = write_export(Path::new("unused.csv"), &table, &table.rows)
            .expect_err("empty export should fail");
        assert!(matches!(err, ExportError::NoRows), "unexpected error: {err:?}");
    }

    #[test]
    fn write_export_writes_file() {
        let temp_dir = unique_test_dir("export");
        fs::create_dir_all(&temp_dir).expect("should create temp dir");
        let path = temp_dir.join("out.csv");

        let table = parse("Id,Shift\na,Day\nb,Night\n").expect("parse should succeed");
        let written = write_export(&path, &table, &table.rows).expect("export should succeed");

        assert_eq!(written, 2);
        let contents = fs::read_to_string(&path).expect("should read export");
        assert_eq!(contents, "Id,Shift\na,Day\nb,Night\n");

        fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
    }
}
