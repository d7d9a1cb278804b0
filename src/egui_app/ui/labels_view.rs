use std::time::Instant;

use eframe::egui::{self, RichText, Ui};

use super::{panel_frame, style};
use crate::artifacts::FetchState;
use crate::egui_app::controller::ModelInfoView;

/// Model info page. Returns true when retry was clicked.
pub(super) fn render(ui: &mut Ui, view: &mut ModelInfoView, now: Instant) -> bool {
    ui.heading("Model Info");
    ui.add_space(6.0);
    let mut retry = false;
    let panel = view.panel().clone();
    let toggled = panel_frame::show(ui, &panel, now, |ui| match view.labels() {
        FetchState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading labels…");
            });
        }
        FetchState::Error(err) => {
            ui.label(RichText::new(err.inline_message()).color(style::palette().error));
            retry = ui.button("Retry").clicked();
        }
        FetchState::Ready(labels) if labels.is_empty() => {
            ui.label(RichText::new("No classes published").color(style::palette().text_muted));
        }
        FetchState::Ready(labels) => {
            egui::Grid::new("model_labels")
                .striped(true)
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label(RichText::new("Class ID").strong());
                    ui.label(RichText::new("Class Name").strong());
                    ui.end_row();
                    for entry in labels.entries() {
                        ui.label(entry.class_id.to_string());
                        ui.label(&entry.class_name);
                        ui.end_row();
                    }
                });
        }
    });
    if toggled {
        view.panel_mut().toggle(now);
    }
    retry
}
