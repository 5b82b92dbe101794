use std::sync::Arc;

use super::filter::{filtered_indices, FilterOptions, FilterPredicates};
use super::model::{Row, Summary, Table};

// ---------------------------------------------------------------------------
// Session – raw table plus the view derived from the current predicates
// ---------------------------------------------------------------------------

/// One loaded table and the rows visible under the current predicates.
///
/// Sessions are values: changing predicates returns a new session whose
/// visible rows are rebuilt from the raw table, never patched in place. The
/// table itself is shared between derived sessions.
#[derive(Debug, Clone)]
pub struct Session {
    table: Arc<Table>,
    options: Arc<FilterOptions>,
    predicates: FilterPredicates,
    visible: Vec<usize>,
}

impl Session {
    /// Start a session over a freshly loaded table with nothing filtered.
    pub fn new(table: Table) -> Self {
        let options = FilterOptions::from_table(&table);
        Session {
            visible: (0..table.len()).collect(),
            table: Arc::new(table),
            options: Arc::new(options),
            predicates: FilterPredicates::default(),
        }
    }

    /// The same table viewed through `predicates`.
    pub fn with_predicates(&self, predicates: FilterPredicates) -> Session {
        let visible = filtered_indices(&self.table, &predicates);
        Session {
            table: Arc::clone(&self.table),
            options: Arc::clone(&self.options),
            predicates,
            visible,
        }
    }

    /// The same table with every predicate cleared.
    pub fn cleared(&self) -> Session {
        Session {
            table: Arc::clone(&self.table),
            options: Arc::clone(&self.options),
            predicates: FilterPredicates::default(),
            visible: (0..self.table.len()).collect(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn predicates(&self) -> &FilterPredicates {
        &self.predicates
    }

    /// Indices into `table().rows` of the visible rows, in table order.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn filtered_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.visible.iter().map(|&i| &self.table.rows[i])
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total_rows: self.table.len(),
            filtered_rows: self.visible.len(),
            columns: self.table.headers.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export::serialize;
    use crate::data::loader::parse;

    fn session() -> Session {
        let table = parse(
            "Date,Shift,VFD_MODE_STATUS\n\
             15/06/24,Night,AUTO\n\
             01/07/24,Day,MANUAL\n\
             ,Night,\n",
        )
        .expect("parse should succeed");
        Session::new(table)
    }

    #[test]
    fn new_session_shows_every_row() {
        let s = session();
        assert_eq!(s.visible_indices(), &[0, 1, 2]);
        assert_eq!(
            s.summary(),
            Summary {
                total_rows: 3,
                filtered_rows: 3,
                columns: 3
            }
        );
    }

    #[test]
    fn predicates_derive_a_new_view() {
        let s = session();
        let june = s.with_predicates(FilterPredicates {
            from_date: Some("01/06/24".into()),
            to_date: Some("30/06/24".into()),
            ..Default::default()
        });
        assert_eq!(june.visible_indices(), &[0, 2]);
        assert_eq!(june.summary().filtered_rows, 2);
        // the original session is untouched
        assert_eq!(s.visible_indices(), &[0, 1, 2]);
    }

    #[test]
    fn clearing_restores_raw_order() {
        let s = session().with_predicates(FilterPredicates {
            shift: Some("Night".into()),
            ..Default::default()
        });
        assert_eq!(s.visible_indices(), &[0, 2]);

        let cleared = s.cleared();
        assert!(cleared.predicates().is_empty());
        let rows: Vec<&Row> = cleared.filtered_rows().collect();
        let raw: Vec<&Row> = cleared.table().rows.iter().collect();
        assert_eq!(rows, raw);
    }

    #[test]
    fn options_follow_the_table() {
        let s = session();
        assert_eq!(s.options().dates, vec!["15/06/24", "01/07/24"]);
        assert_eq!(s.options().shifts, vec!["Day", "Night"]);
        assert_eq!(s.options().modes, vec!["AUTO", "MANUAL", "(Empty)"]);
    }

    #[test]
    fn exports_only_visible_rows() {
        let s = session().with_predicates(FilterPredicates {
            mode: Some("MANUAL".into()),
            ..Default::default()
        });
        let text = serialize(s.table(), s.filtered_rows()).expect("export should succeed");
        assert_eq!(text, "Date,Shift,VFD_MODE_STATUS\n01/07/24,Day,MANUAL\n");
    }
}
