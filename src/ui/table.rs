use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Record table (central panel)
// ---------------------------------------------------------------------------

/// Render the visible rows of the current session.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let session = match &state.session {
        Some(s) => s,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a CSV file to view records  (File → Open CSV…)");
            });
            return;
        }
    };

    let table = session.table();
    let visible = session.visible_indices();
    if visible.is_empty() || table.headers.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data matches the current filters.");
        });
        return;
    }

    let color_map = state.color_map.as_ref();

    egui::ScrollArea::horizontal()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0).clip(true), table.headers.len())
                .header(22.0, |mut header| {
                    for name in &table.headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, visible.len(), |mut row| {
                        let record = &table.rows[visible[row.index()]];
                        for (col, value) in table.display_values(record).enumerate() {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell_text(value, col, color_map));
                            });
                        }
                    });
                });
        });
}

/// Blank cells show a grey dash; highlighted columns get their value colour.
fn cell_text(value: &str, col: usize, color_map: Option<&ColorMap>) -> RichText {
    if value.is_empty() {
        return RichText::new("-").italics().color(Color32::from_gray(0x99));
    }
    let colour = color_map
        .filter(|m| m.column == col)
        .and_then(|m| m.color_for(value));
    match colour {
        Some(c) => RichText::new(value).color(c).strong(),
        None => RichText::new(value),
    }
}
