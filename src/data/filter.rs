use std::collections::BTreeSet;

use super::date::LogDate;
use super::model::Table;

/// Placeholder listed for blank cells in categorical option lists.
pub const EMPTY_MARKER: &str = "(Empty)";

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// The user's current selections. `None` or an empty string means
/// "no constraint on that dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicates {
    /// Inclusive lower bound, `DD/MM/YY`.
    pub from_date: Option<String>,
    /// Inclusive upper bound, `DD/MM/YY`.
    pub to_date: Option<String>,
    pub shift: Option<String>,
    pub mode: Option<String>,
}

impl FilterPredicates {
    /// Whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        [&self.from_date, &self.to_date, &self.shift, &self.mode]
            .into_iter()
            .all(|p| active(p).is_none())
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Positions of the columns the predicates apply to. A missing column
/// disables its predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterColumns {
    pub date: Option<usize>,
    pub shift: Option<usize>,
    pub mode: Option<usize>,
}

impl FilterColumns {
    /// Date: first header containing "date"; shift: first header named
    /// "shift"; mode: first header named "vfd_mode_status". Case-insensitive.
    pub fn resolve(table: &Table) -> Self {
        let find = |pred: &dyn Fn(&str) -> bool| {
            table
                .headers
                .iter()
                .find(|h| pred(h.to_lowercase().as_str()))
                .and_then(|h| table.column_index(h))
        };
        FilterColumns {
            date: find(&|h: &str| h.contains("date")),
            shift: find(&|h: &str| h == "shift"),
            mode: find(&|h: &str| h == "vfd_mode_status"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of rows that satisfy every active predicate, in table order.
///
/// A row passes when:
/// * its date is blank, indeterminate, or within `[from_date, to_date]`;
/// * its shift equals `shift` exactly (when set);
/// * its mode equals `mode` exactly (when set).
pub fn filtered_indices(table: &Table, predicates: &FilterPredicates) -> Vec<usize> {
    let columns = FilterColumns::resolve(table);
    let from = active(&predicates.from_date).map(LogDate::parse);
    let to = active(&predicates.to_date).map(LogDate::parse);
    let shift = active(&predicates.shift);
    let mode = active(&predicates.mode);

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            if let Some(col) = columns.date.filter(|_| from.is_some() || to.is_some()) {
                let value = row.get(col);
                if !value.is_empty() {
                    let current = LogDate::parse(value);
                    if from.is_some_and(|start| current.is_before(&start)) {
                        return false;
                    }
                    if to.is_some_and(|end| current.is_after(&end)) {
                        return false;
                    }
                }
            }
            if let (Some(col), Some(wanted)) = (columns.shift, shift) {
                if row.get(col) != wanted {
                    return false;
                }
            }
            if let (Some(col), Some(wanted)) = (columns.mode, mode) {
                if row.get(col) != wanted {
                    return false;
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Selectable options
// ---------------------------------------------------------------------------

/// Distinct values of a column in byte order (uppercase before lowercase),
/// with [`EMPTY_MARKER`] last when any cell is blank.
pub fn distinct_values(table: &Table, column: usize) -> Vec<String> {
    let mut has_empty = false;
    let mut values = BTreeSet::new();
    for row in &table.rows {
        match row.get(column) {
            "" | EMPTY_MARKER => has_empty = true,
            v => {
                values.insert(v);
            }
        }
    }

    let mut out: Vec<String> = values.into_iter().map(str::to_string).collect();
    if has_empty {
        out.push(EMPTY_MARKER.to_string());
    }
    out
}

/// Distinct non-blank dates of a column, earliest first. Dates that cannot be
/// placed on the calendar go last.
pub fn distinct_dates(table: &Table, column: usize) -> Vec<String> {
    let unique: BTreeSet<&str> = table
        .rows
        .iter()
        .map(|row| row.get(column))
        .filter(|v| !v.trim().is_empty())
        .collect();

    let mut dates: Vec<String> = unique.into_iter().map(str::to_string).collect();
    dates.sort_by_cached_key(|d| LogDate::parse(d).sort_key());
    dates
}

/// Option lists for the filter selectors of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub columns: FilterColumns,
    pub dates: Vec<String>,
    pub shifts: Vec<String>,
    pub modes: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> Self {
        let columns = FilterColumns::resolve(table);
        FilterOptions {
            columns,
            dates: columns.date.map(|c| distinct_dates(table, c)).unwrap_or_default(),
            shifts: columns.shift.map(|c| distinct_values(table, c)).unwrap_or_default(),
            modes: columns.mode.map(|c| distinct_values(table, c)).unwrap_or_default(),
        }
    }

    /// Predicates spanning the earliest to the latest date, other dimensions
    /// unconstrained.
    pub fn default_predicates(&self) -> FilterPredicates {
        FilterPredicates {
            from_date: self.dates.first().cloned(),
            to_date: self.dates.last().cloned(),
            ..FilterPredicates::default()
        }
    }
}

/// Map a selector choice to a predicate value; the empty marker selects
/// nothing.
pub fn predicate_value(choice: &str) -> Option<String> {
    match choice {
        "" | EMPTY_MARKER => None,
        v => Some(v.to_string()),
    }
}
