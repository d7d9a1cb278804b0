//! Attribution line charts, one handle per visual slot.

mod geometry;

use std::collections::HashMap;
use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use thiserror::Error;
use tracing::debug;

use crate::artifacts::AttributionSeries;

pub use geometry::LINE_TENSION;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Charts need at least one frame.
    #[error("Cannot chart an empty attribution series")]
    EmptySeries,
}

/// Hover details for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartTooltip {
    pub frame: usize,
    pub value: f64,
}

impl ChartTooltip {
    pub fn lines(&self) -> [String; 2] {
        [
            format!("Frame: {}", self.frame),
            format!("Value: {:.4}", self.value),
        ]
    }
}

/// Computed line geometry for one series at one size.
///
/// Coordinates are relative to the chart's top-left corner.
#[derive(Debug)]
pub struct ChartHandle {
    id: u64,
    series: Arc<AttributionSeries>,
    size: Vec2,
    plot: Rect,
    bounds: (f64, f64),
    points: Vec<Pos2>,
    curve: Vec<Pos2>,
}

impl ChartHandle {
    fn build(id: u64, series: Arc<AttributionSeries>, size: Vec2) -> Result<Self, ChartError> {
        let range = series.value_range().ok_or(ChartError::EmptySeries)?;
        let plot = geometry::plot_rect(size);
        let bounds = geometry::value_bounds(range);
        let points = geometry::scale_points(series.values(), bounds, plot);
        let curve = geometry::smooth_curve(&points, LINE_TENSION, plot);
        Ok(Self {
            id,
            series,
            size,
            plot,
            bounds,
            points,
            curve,
        })
    }

    /// Identifier unique within the owning controller.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn series(&self) -> &Arc<AttributionSeries> {
        &self.series
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn plot_rect(&self) -> Rect {
        self.plot
    }

    /// Lower and upper value drawn at the bottom and top of the plot.
    pub fn value_bounds(&self) -> (f64, f64) {
        self.bounds
    }

    /// X-axis labels, the frame indices.
    pub fn labels(&self) -> Vec<String> {
        (0..self.series.frame_count()).map(|i| i.to_string()).collect()
    }

    /// One position per frame.
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Smoothed polyline to stroke.
    pub fn curve(&self) -> &[Pos2] {
        &self.curve
    }

    /// Frame whose point is horizontally closest to `x`.
    pub fn nearest_frame(&self, x: f32) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
            .map(|(index, _)| index)
    }

    /// Tooltip for the pointer at `pos`, or `None` outside the plot.
    pub fn tooltip_at(&self, pos: Pos2) -> Option<ChartTooltip> {
        if !self.plot.expand(4.0).contains(pos) {
            return None;
        }
        let frame = self.nearest_frame(pos.x)?;
        Some(ChartTooltip {
            frame,
            value: self.series.value(frame)?,
        })
    }

    fn matches(&self, series: &Arc<AttributionSeries>, size: Vec2) -> bool {
        Arc::ptr_eq(&self.series, series) && self.size == size
    }
}

/// Owns the live chart handle of every slot.
#[derive(Debug, Default)]
pub struct ChartController {
    slots: HashMap<String, ChartHandle>,
    next_id: u64,
}

impl ChartController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh handle for `slot`, destroying the previous one first.
    pub fn render(
        &mut self,
        slot: &str,
        series: Arc<AttributionSeries>,
        size: Vec2,
    ) -> Result<&ChartHandle, ChartError> {
        if series.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        self.destroy(slot);
        let handle = self.build_handle(slot, series, size)?;
        Ok(self.slots.entry(slot.to_string()).insert_entry(handle).into_mut())
    }

    /// Keep the handle for `slot` in step with `series` and `size`, rebuilding
    /// only when the series identity or the size changed.
    pub fn sync(
        &mut self,
        slot: &str,
        series: &Arc<AttributionSeries>,
        size: Vec2,
    ) -> Result<&ChartHandle, ChartError> {
        if series.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        let handle = match self.slots.remove(slot) {
            Some(handle) if handle.matches(series, size) => handle,
            previous => {
                if let Some(stale) = previous {
                    drop(stale);
                    debug!("Chart '{slot}' destroyed");
                }
                self.build_handle(slot, series.clone(), size)?
            }
        };
        Ok(self.slots.entry(slot.to_string()).insert_entry(handle).into_mut())
    }

    pub fn handle(&self, slot: &str) -> Option<&ChartHandle> {
        self.slots.get(slot)
    }

    /// Release the handle bound to `slot`. Returns false if there was none.
    pub fn destroy(&mut self, slot: &str) -> bool {
        let removed = self.slots.remove(slot).is_some();
        if removed {
            debug!("Chart '{slot}' destroyed");
        }
        removed
    }

    pub fn destroy_all(&mut self) {
        let slots: Vec<String> = self.slots.keys().cloned().collect();
        for slot in slots {
            self.destroy(&slot);
        }
    }

    fn build_handle(
        &mut self,
        slot: &str,
        series: Arc<AttributionSeries>,
        size: Vec2,
    ) -> Result<ChartHandle, ChartError> {
        self.next_id += 1;
        let handle = ChartHandle::build(self.next_id, series, size)?;
        debug!(
            "Chart '{slot}' rendered {} frames at {:.0}x{:.0}",
            handle.points.len(),
            size.x,
            size.y
        );
        Ok(handle)
    }

    /// Number of handles currently alive.
    pub fn live_handles(&self) -> usize {
        self.slots.len()
    }
}
