use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::export_file_name;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No table loaded.");
        return;
    };

    // Clone what we need so we can mutate state below.
    let options = session.options().clone();
    let current = session.predicates().clone();

    if options.columns.date.is_some() {
        ui.strong("From date");
        let from = current.from_date.as_deref();
        if let Some(choice) = choice_combo(ui, "from_date", "Select From Date", from, &options.dates)
        {
            state.update_predicates(|p| p.from_date = choice);
        }

        ui.strong("To date");
        let to = current.to_date.as_deref();
        if let Some(choice) = choice_combo(ui, "to_date", "Select To Date", to, &options.dates) {
            state.update_predicates(|p| p.to_date = choice);
        }
        ui.separator();
    }

    if options.columns.shift.is_some() {
        ui.strong("Shift");
        let shift = current.shift.as_deref();
        if let Some(choice) = choice_combo(ui, "shift", "All Shifts", shift, &options.shifts) {
            state.select_shift(choice.as_deref().unwrap_or(""));
        }
    }

    if options.columns.mode.is_some() {
        ui.strong("Mode");
        let mode = current.mode.as_deref();
        if let Some(choice) = choice_combo(ui, "mode", "All Modes", mode, &options.modes) {
            state.select_mode(choice.as_deref().unwrap_or(""));
        }
    }
}

/// A combo box over `values` plus a leading "unset" entry. Returns the new
/// choice when the user picked something.
fn choice_combo(
    ui: &mut Ui,
    id: &str,
    unset_label: &str,
    current: Option<&str>,
    values: &[String],
) -> Option<Option<String>> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or(unset_label))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), unset_label).clicked() {
                picked = Some(None);
            }
            for value in values {
                if ui
                    .selectable_label(current == Some(value.as_str()), value)
                    .clicked()
                {
                    picked = Some(Some(value.clone()));
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload sample").clicked() {
                state.load_sample();
                ui.close_menu();
            }
        });

        ui.separator();

        let loaded = state.session.is_some();
        if ui
            .add_enabled(loaded, egui::Button::new("Download filtered"))
            .clicked()
        {
            save_file_dialog(state);
        }
        let filtered = state
            .session
            .as_ref()
            .is_some_and(|s| !s.predicates().is_empty());
        if ui
            .add_enabled(filtered, egui::Button::new("Clear filters"))
            .clicked()
        {
            state.clear_filters();
        }

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(session.summary().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV log")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let empty = state
        .session
        .as_ref()
        .is_some_and(|s| s.visible_indices().is_empty());
    if empty {
        state.status_message = Some("No data to download!".to_string());
        return;
    }

    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .add_filter("CSV", &["csv"])
        .set_directory(&state.config.export_dir)
        .set_file_name(export_file_name(chrono::Utc::now()))
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(_) => state.status_message = None,
            Err(e) => state.report("Export failed", &e),
        }
    }
}
