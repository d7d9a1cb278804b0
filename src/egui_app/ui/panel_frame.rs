use std::time::Instant;

use eframe::egui::{self, RichText, Ui};

use super::style;
use crate::egui_app::state::{CollapsiblePanel, PanelArrow};

/// Draw a titled collapsible section. Returns true when the header toggle was
/// clicked; the caller owns the panel and applies the toggle.
pub(super) fn show(
    ui: &mut Ui,
    panel: &CollapsiblePanel,
    now: Instant,
    body: impl FnOnce(&mut Ui),
) -> bool {
    let mut toggled = false;
    egui::Frame::new()
        .stroke(style::panel_border())
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(panel.title()).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let arrow = match panel.arrow() {
                        PanelArrow::Up => "⏶",
                        PanelArrow::Down => "⏷",
                    };
                    toggled = ui.small_button(arrow).clicked();
                });
            });
            if panel.is_visible() {
                ui.separator();
                let openness = panel.openness(now);
                ui.scope(|ui| {
                    ui.set_opacity(openness);
                    body(ui);
                });
            }
        });
    ui.add_space(8.0);
    toggled
}
