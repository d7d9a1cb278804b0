use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, StrokeKind, Ui};

use super::style;
use crate::artifacts::FetchState;
use crate::chart::ChartHandle;
use crate::egui_app::controller::ExplanationView;

const CHART_HEIGHT: f32 = 240.0;
const MIN_LABEL_SPACING: f32 = 36.0;

/// Statistics chart for the page. Returns true when retry was clicked.
pub(super) fn render(ui: &mut Ui, view: &mut ExplanationView) -> bool {
    match view.attributions() {
        None => return false,
        Some(FetchState::Loading) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading attributions…");
            });
            return false;
        }
        Some(FetchState::Error(err)) => {
            let message = err.inline_message();
            ui.label(RichText::new(message).color(style::palette().error));
            return ui.button("Retry").clicked();
        }
        Some(FetchState::Ready(_)) => {}
    }
    let size = egui::vec2(ui.available_width().max(160.0).floor(), CHART_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    match view.sync_chart(size) {
        Some(Ok(handle)) => paint(ui, rect, response.hover_pos(), handle),
        Some(Err(err)) => {
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                err.to_string(),
                FontId::proportional(14.0),
                style::palette().text_muted,
            );
        }
        None => {}
    }
    false
}

fn paint(ui: &Ui, rect: Rect, hover: Option<Pos2>, handle: &ChartHandle) {
    let palette = style::palette();
    let painter = ui.painter_at(rect);
    let offset = rect.min.to_vec2();
    let plot = handle.plot_rect().translate(offset);
    painter.rect_stroke(plot, 0.0, style::panel_border(), StrokeKind::Inside);

    let font = FontId::monospace(11.0);
    let (lo, hi) = handle.value_bounds();
    for (value, y) in [(hi, plot.top()), (lo, plot.bottom())] {
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{value:.3}"),
            font.clone(),
            palette.text_muted,
        );
    }
    let labels = handle.labels();
    let capacity = (plot.width() / MIN_LABEL_SPACING).max(1.0) as usize;
    let stride = labels.len().div_ceil(capacity).max(1);
    for (label, point) in labels.iter().zip(handle.points()).step_by(stride) {
        painter.text(
            egui::pos2(point.x + offset.x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            label,
            font.clone(),
            palette.text_muted,
        );
    }

    let curve: Vec<Pos2> = handle.curve().iter().map(|p| *p + offset).collect();
    painter.add(egui::Shape::line(curve, style::chart_line()));
    if handle.points().len() <= 200 {
        for point in handle.points() {
            painter.circle_filled(*point + offset, 2.5, palette.accent_mint);
        }
    }

    let Some(pointer) = hover else {
        return;
    };
    let Some(tooltip) = handle.tooltip_at(pointer - offset) else {
        return;
    };
    let Some(point) = handle.points().get(tooltip.frame).map(|p| *p + offset) else {
        return;
    };
    painter.line_segment(
        [egui::pos2(point.x, plot.top()), egui::pos2(point.x, plot.bottom())],
        Stroke::new(1.0, palette.grid_soft),
    );
    painter.circle_stroke(point, 4.0, Stroke::new(1.5, palette.accent_ice));
    let text = tooltip.lines().join("\n");
    let galley = painter.layout_no_wrap(text, font, palette.text_primary);
    let mut anchor = point + egui::vec2(10.0, -10.0 - galley.size().y);
    if anchor.x + galley.size().x + 8.0 > rect.right() {
        anchor.x = point.x - galley.size().x - 18.0;
    }
    anchor.y = anchor.y.max(rect.top() + 2.0);
    let frame = Rect::from_min_size(anchor, galley.size()).expand(4.0);
    painter.rect_filled(frame, 2.0, palette.bg_primary);
    painter.rect_stroke(frame, 2.0, Stroke::new(1.0, palette.panel_outline), StrokeKind::Outside);
    painter.galley(anchor, galley, Color32::WHITE);
}
