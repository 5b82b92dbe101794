use std::fmt;

// ---------------------------------------------------------------------------
// Row – one normalized data line
// ---------------------------------------------------------------------------

/// A single normalized row. Values are stored positionally, one per header,
/// so the "every row has every header" invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Build a row for `width` headers, padding missing trailing values with
    /// empty strings and ignoring any surplus.
    pub fn padded(mut values: Vec<String>, width: usize) -> Self {
        values.resize(width, String::new());
        Row { values }
    }

    /// Value at a column position (empty string past the end).
    pub fn get(&self, idx: usize) -> &str {
        self.values.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed dataset: ordered header names plus normalized rows.
///
/// Header names are not deduplicated. When a name repeats, lookups by name
/// resolve to its *last* position, so every column carrying that name shows
/// the last value, the same way a name-keyed record would behave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let width = headers.len();
        debug_assert!(rows.iter().all(|r| r.values().len() == width));
        Table { headers, rows }
    }

    /// Position of the value a header name resolves to.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().rposition(|h| h == name)
    }

    /// Value of `row` under header `name` (empty when the header is unknown).
    pub fn value<'a>(&self, row: &'a Row, name: &str) -> &'a str {
        self.column_index(name).map(|i| row.get(i)).unwrap_or("")
    }

    /// Values of `row` in header order, with duplicate names resolved.
    pub fn display_values<'a>(&'a self, row: &'a Row) -> impl Iterator<Item = &'a str> + 'a {
        self.headers.iter().map(move |h| self.value(row, h))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Summary counters
// ---------------------------------------------------------------------------

/// Derived counters shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub columns: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} shown, {} columns",
            self.total_rows, self.filtered_rows, self.columns
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn padded_row_fills_missing_trailing_values() {
        let row = Row::padded(strings(&["a"]), 3);
        assert_eq!(row.values(), strings(&["a", "", ""]).as_slice());
        assert_eq!(row.get(7), "");
    }

    #[test]
    fn duplicate_header_resolves_to_last_value() {
        let table = Table::new(
            strings(&["A", "B", "A"]),
            vec![Row::padded(strings(&["1", "2", "3"]), 3)],
        );
        let row = &table.rows[0];
        assert_eq!(table.value(row, "A"), "3");
        assert_eq!(table.display_values(row).collect::<Vec<_>>(), vec!["3", "2", "3"]);
        assert_eq!(table.value(row, "missing"), "");
    }
}
