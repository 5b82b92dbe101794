use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::ViewerConfig;
use crate::data::export::write_export;
use crate::data::filter::{distinct_values, predicate_value, FilterPredicates};
use crate::data::loader::{load_file, LoadError};
use crate::data::session::Session;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded session (None until a file has been loaded).
    pub session: Option<Session>,

    /// Tint for the highlight column of the current table.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            session: None,
            color_map: None,
            status_message: None,
        }
    }

    /// Load the configured sample file; a missing file leaves guidance
    /// towards manual loading instead of an error.
    pub fn load_sample(&mut self) {
        let path = self.config.sample_path.clone();
        match load_file(&path) {
            Ok(table) => {
                log::info!("loaded sample {}", path.display());
                self.set_session(Session::new(table));
            }
            Err(LoadError::Io { source, .. }) => {
                log::warn!("sample {} unavailable: {source}", path.display());
                self.status_message = Some(format!(
                    "Unable to load {} ({source}). Use File → Open CSV… to load a file directly.",
                    path.display()
                ));
            }
            Err(e) => self.report("Error processing CSV data", &anyhow::Error::new(e)),
        }
    }

    /// Load a user-selected file, replacing any current table.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => self.set_session(Session::new(table)),
            Err(LoadError::NotCsv(_)) => {
                self.status_message = Some("Please select a valid CSV file.".to_string());
            }
            Err(e) => self.report("Error processing uploaded CSV", &anyhow::Error::new(e)),
        }
    }

    /// Ingest a newly loaded session: reset selectors to the full date span
    /// and rebuild the colour map.
    pub fn set_session(&mut self, session: Session) {
        let summary = session.summary();
        log::info!("{summary} ({:?})", session.table().headers);
        if session.table().is_empty() {
            log::warn!("no row matched the header width; check the delimiter");
        }

        let defaults = session.options().default_predicates();
        let session = session.with_predicates(defaults);

        let highlight = &self.config.highlight_column;
        self.color_map = session
            .table()
            .column_index(highlight)
            .filter(|_| !highlight.is_empty())
            .map(|col| {
                let distinct = distinct_values(session.table(), col);
                ColorMap::new(col, &distinct)
            });

        self.session = Some(session);
        self.status_message = None;
    }

    /// Re-filter with `update` applied to the current predicates.
    pub fn update_predicates(&mut self, update: impl FnOnce(&mut FilterPredicates)) {
        if let Some(session) = &self.session {
            let mut predicates = session.predicates().clone();
            update(&mut predicates);
            if &predicates != session.predicates() {
                self.session = Some(session.with_predicates(predicates));
            }
        }
    }

    /// Apply a categorical selector choice (`(Empty)` means "all").
    pub fn select_shift(&mut self, choice: &str) {
        self.update_predicates(|p| p.shift = predicate_value(choice));
    }

    pub fn select_mode(&mut self, choice: &str) {
        self.update_predicates(|p| p.mode = predicate_value(choice));
    }

    pub fn clear_filters(&mut self) {
        if let Some(session) = &self.session {
            self.session = Some(session.cleared());
        }
    }

    /// Write the visible rows to `path`.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let session = self.session.as_ref().context("no table loaded")?;
        write_export(path, session.table(), session.filtered_rows())
            .with_context(|| format!("exporting to {}", path.display()))
    }

    pub fn report(&mut self, what: &str, e: &anyhow::Error) {
        log::error!("{what}: {e:#}");
        self.status_message = Some(format!("{what}: {e:#}"));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::loader::parse;

    fn loaded_state() -> AppState {
        let table = parse(
            "Date,Shift,VFD_MODE_STATUS\n\
             15/06/24,Night,AUTO\n\
             20/06/24,Day,MANUAL\n\
             01/07/24,Night,AUTO\n",
        )
        .expect("parse should succeed");
        let mut state = AppState::new(ViewerConfig::default());
        state.set_session(Session::new(table));
        state
    }

    #[test]
    fn new_session_defaults_to_full_date_span() {
        let state = loaded_state();
        let session = state.session.as_ref().expect("session loaded");
        assert_eq!(session.predicates().from_date.as_deref(), Some("15/06/24"));
        assert_eq!(session.predicates().to_date.as_deref(), Some("01/07/24"));
        assert_eq!(session.summary().filtered_rows, 3);
        assert_eq!(state.color_map.as_ref().map(|m| m.column), Some(2));
    }

    #[test]
    fn selectors_refilter_and_clear() {
        let mut state = loaded_state();
        state.select_shift("Night");
        state.select_mode("AUTO");
        state.update_predicates(|p| p.to_date = Some("30/06/24".into()));
        let session = state.session.as_ref().expect("session loaded");
        assert_eq!(session.visible_indices(), &[0]);

        state.select_shift("(Empty)");
        let session = state.session.as_ref().expect("session loaded");
        assert_eq!(session.predicates().shift, None);

        state.clear_filters();
        let session = state.session.as_ref().expect("session loaded");
        assert_eq!(session.visible_indices(), &[0, 1, 2]);
    }

    #[test]
    fn missing_sample_leaves_guidance() {
        let mut state = AppState::new(ViewerConfig {
            sample_path: PathBuf::from("no/such/sample_data.csv"),
            ..ViewerConfig::default()
        });
        state.load_sample();
        assert!(state.session.is_none());
        let msg = state.status_message.expect("guidance message");
        assert!(msg.contains("Open CSV"), "unexpected message: {msg}");
    }

    #[test]
    fn non_csv_upload_is_rejected() {
        let mut state = loaded_state();
        state.load_path(Path::new("notes.txt"));
        assert!(state.session.is_some(), "previous table should stay loaded");
        assert_eq!(
            state.status_message.as_deref(),
            Some("Please select a valid CSV file.")
        );
    }
}
