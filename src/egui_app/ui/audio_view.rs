use std::time::Instant;

use eframe::egui::{self, RichText, Sense, StrokeKind, TextureOptions, Ui};

use super::style;
use crate::egui_app::controller::ExplanationView;
use crate::waveform::{WaveformHandle, WaveformStatus};

const WAVEFORM_HEIGHT: f32 = 96.0;

pub(super) fn render(ui: &mut Ui, view: &mut ExplanationView, now: Instant) {
    let mut toggle = None;
    for (index, slot) in view.audio_slots_mut().iter_mut().enumerate() {
        ui.label(RichText::new(slot.title()).color(style::palette().text_muted));
        if let Some(message) = slot.inline_error() {
            ui.label(RichText::new(message).color(style::palette().error));
            continue;
        }
        let Some(handle) = slot.handle_mut() else {
            continue;
        };
        if render_handle(ui, handle, now) {
            toggle = Some(index);
        }
        ui.add_space(6.0);
    }
    if let Some(index) = toggle {
        view.toggle_playback(index, now);
    }
}

/// Returns true when play/pause was clicked.
fn render_handle(ui: &mut Ui, handle: &mut WaveformHandle, now: Instant) -> bool {
    match handle.status().clone() {
        WaveformStatus::Idle | WaveformStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading audio…");
            });
            false
        }
        WaveformStatus::Failed(message) => {
            ui.label(RichText::new(message).color(style::palette().error));
            false
        }
        WaveformStatus::Destroyed => false,
        WaveformStatus::Ready => render_ready(ui, handle, now),
    }
}

fn render_ready(ui: &mut Ui, handle: &mut WaveformHandle, now: Instant) -> bool {
    if handle.texture().is_none() {
        if let Some(image) = handle.image().cloned() {
            let name = format!("waveform_{}", handle.container());
            let texture = ui.ctx().load_texture(name, image, TextureOptions::LINEAR);
            handle.set_texture(texture);
        }
    }
    let size = egui::vec2(ui.available_width().max(120.0), WAVEFORM_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, style::palette().bg_primary);
    if let Some(texture) = handle.texture() {
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
    }
    if let Some(progress) = handle.progress(now) {
        let x = rect.left() + rect.width() * progress;
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            style::playhead(),
        );
    }
    painter.rect_stroke(rect, 0.0, style::panel_border(), StrokeKind::Inside);

    let mut clicked = response.clicked();
    ui.horizontal(|ui| {
        let label = if handle.is_playing() { "⏸ Pause" } else { "▶ Play" };
        clicked |= ui.button(label).clicked();
        if let Some(duration) = handle.duration_seconds() {
            ui.label(
                RichText::new(format!("{duration:.1} s")).color(style::palette().text_muted),
            );
        }
    });
    clicked
}
