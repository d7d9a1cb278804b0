use eframe::egui::{self, RichText};

use super::style;
use crate::egui_app::state::AlertList;

/// Bottom strip with the newest alerts and a dismiss button each.
pub(super) fn render(ctx: &egui::Context, alerts: &mut AlertList) {
    if alerts.is_empty() {
        return;
    }
    let mut dismiss = None;
    let mut clear = false;
    egui::TopBottomPanel::bottom("alerts")
        .resizable(false)
        .max_height(140.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Notifications").strong());
                clear = ui.small_button("Clear all").clicked();
            });
            egui::ScrollArea::vertical().show(ui, |ui| {
                for alert in alerts.entries() {
                    ui.horizontal(|ui| {
                        if ui.small_button("✕").clicked() {
                            dismiss = Some(alert.id);
                        }
                        ui.label(RichText::new(&alert.message).color(style::alert_color(alert.tone)));
                    });
                }
            });
        });
    if clear {
        alerts.clear();
    } else if let Some(id) = dismiss {
        alerts.dismiss(id);
    }
}
