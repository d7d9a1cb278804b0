use eframe::egui::{self, RichText, TextureOptions, Ui};

use super::style;
use crate::artifacts::FetchState;
use crate::egui_app::controller::{ExplanationView, ImageChoice};

const MAX_IMAGE_HEIGHT: f32 = 360.0;

pub(super) fn render(ui: &mut Ui, view: &mut ExplanationView) {
    let Some(images) = view.images_mut() else {
        return;
    };
    let switch_label = match images.showing() {
        ImageChoice::HeatMap => "Show spectrogram",
        ImageChoice::Spectrogram => "Show heat map",
    };
    ui.horizontal(|ui| {
        ui.label(RichText::new(images.current().title()).strong());
        if ui.button(switch_label).clicked() {
            images.toggle();
        }
    });
    let slot = images.current_mut();
    let image = match slot.state() {
        FetchState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading image…");
            });
            return;
        }
        FetchState::Error(err) => {
            ui.label(RichText::new(err.inline_message()).color(style::palette().error));
            return;
        }
        FetchState::Ready(image) => image,
    };
    let pixel_size = egui::vec2(image.size[0] as f32, image.size[1] as f32);
    if slot.texture().is_none() {
        let texture = ui.ctx().load_texture(
            format!("image_{}", slot.title()),
            image.clone(),
            TextureOptions::LINEAR,
        );
        slot.set_texture(texture);
    }
    let Some(texture) = slot.texture() else {
        return;
    };
    let scale = (ui.available_width() / pixel_size.x)
        .min(MAX_IMAGE_HEIGHT / pixel_size.y)
        .min(1.0);
    let size = pixel_size * scale;
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
}
