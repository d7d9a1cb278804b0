//! egui renderer for the dashboard.

mod alerts_view;
mod audio_view;
mod chart_view;
mod image_view;
mod labels_view;
mod panel_frame;
pub mod style;

use std::time::{Duration, Instant};

use eframe::egui::{self, RichText};

use crate::egui_app::controller::{ActiveView, EguiController, ExplanationView};
use crate::egui_app::state::Section;

/// Smallest window the layout still fits in.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(800.0, 560.0);

const REPAINT_INTERVAL: Duration = Duration::from_millis(16);

/// eframe app wrapping [`EguiController`].
pub struct EguiApp {
    controller: EguiController,
    visuals_applied: bool,
}

impl EguiApp {
    pub fn new(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_applied: false,
        }
    }

    fn ensure_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_applied {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_applied = true;
    }

    fn render_sections(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sections")
            .resizable(false)
            .default_width(190.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("XAI Dashboard").strong());
                ui.separator();
                let current = self.controller.current_section();
                let mut chosen = None;
                for section in Section::ALL {
                    if ui
                        .selectable_label(section == current, section.title())
                        .clicked()
                    {
                        chosen = Some(section);
                    }
                }
                if let Some(section) = chosen {
                    let _ = self.controller.select_section(section.id());
                }
            });
    }

    fn render_page(&mut self, ctx: &egui::Context, now: Instant) {
        let mut retry = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                retry = match self.controller.view_mut() {
                    ActiveView::Home => {
                        render_home(ui);
                        false
                    }
                    ActiveView::Explanation(view) => render_explanation(ui, view, now),
                    ActiveView::ModelInfo(view) => labels_view::render(ui, view, now),
                };
            });
        });
        if retry {
            self.controller.retry();
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_visuals(ctx);
        let now = Instant::now();
        self.controller.poll_jobs();
        self.controller.tick(now);
        self.render_sections(ctx);
        alerts_view::render(ctx, self.controller.alerts_mut());
        self.render_page(ctx, now);
        if self.controller.is_busy() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }
}

fn render_home(ui: &mut egui::Ui) {
    ui.heading("Explainable AI for audio classification");
    ui.add_space(6.0);
    ui.label(
        "Pick an explanation method on the left to inspect per-frame attribution \
         scores next to the audio and images the analysis pipeline produced.",
    );
    ui.add_space(4.0);
    ui.label(
        RichText::new("Model Info lists the classes the model predicts.")
            .color(style::palette().text_muted),
    );
}

/// Returns true when the user asked to retry the attributions fetch.
fn render_explanation(ui: &mut egui::Ui, view: &mut ExplanationView, now: Instant) -> bool {
    ui.heading(view.method().title());
    ui.add_space(6.0);
    let mut retry = false;
    if view.attributions().is_some() {
        let panel = view.panels().statistics.clone();
        let toggled = panel_frame::show(ui, &panel, now, |ui| {
            retry = chart_view::render(ui, view);
        });
        if toggled {
            view.panels_mut().statistics.toggle(now);
        }
    }
    let panel = view.panels().audio.clone();
    let toggled = panel_frame::show(ui, &panel, now, |ui| audio_view::render(ui, view, now));
    if toggled {
        view.panels_mut().audio.toggle(now);
    }
    if view.images().is_some() {
        let panel = view.panels().image.clone();
        let toggled = panel_frame::show(ui, &panel, now, |ui| image_view::render(ui, view));
        if toggled {
            view.panels_mut().image.toggle(now);
        }
    }
    retry
}
