use std::time::{Duration, Instant};

/// Length of every expand/collapse animation.
pub const PANEL_TRANSITION: Duration = Duration::from_millis(300);

/// Visibility phase of a collapsible panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Expanded,
    Collapsing,
    Collapsed,
    Expanding,
}

/// Toggle arrow drawn in the panel header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelArrow {
    Up,
    Down,
}

/// One titled section that animates between expanded and collapsed.
///
/// A toggle starts a fixed-length transition; further toggles are ignored
/// until [`CollapsiblePanel::tick`] observes that the transition elapsed.
#[derive(Clone, Debug)]
pub struct CollapsiblePanel {
    title: String,
    state: PanelState,
    started: Option<Instant>,
}

impl CollapsiblePanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: PanelState::Expanded,
            started: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Start a transition from a stable state. Returns false when ignored.
    pub fn toggle(&mut self, now: Instant) -> bool {
        let next = match self.state {
            PanelState::Expanded => PanelState::Collapsing,
            PanelState::Collapsed => PanelState::Expanding,
            PanelState::Collapsing | PanelState::Expanding => return false,
        };
        self.state = next;
        self.started = Some(now);
        true
    }

    /// Finish a transition once its time is up. Returns true if the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(started) = self.started else {
            return false;
        };
        if now.saturating_duration_since(started) < PANEL_TRANSITION {
            return false;
        }
        self.state = match self.state {
            PanelState::Collapsing => PanelState::Collapsed,
            PanelState::Expanding => PanelState::Expanded,
            stable => stable,
        };
        self.started = None;
        true
    }

    pub fn is_transitioning(&self) -> bool {
        self.started.is_some()
    }

    /// Arrow for the last stable state; transitions keep the pre-toggle arrow.
    pub fn arrow(&self) -> PanelArrow {
        match self.state {
            PanelState::Expanded | PanelState::Collapsing => PanelArrow::Up,
            PanelState::Collapsed | PanelState::Expanding => PanelArrow::Down,
        }
    }

    /// Whether the body is drawn at all.
    pub fn is_visible(&self) -> bool {
        self.state != PanelState::Collapsed
    }

    /// How far open the body is, from 0 (collapsed) to 1 (expanded).
    pub fn openness(&self, now: Instant) -> f32 {
        let progress = self
            .started
            .map(|started| {
                (now.saturating_duration_since(started).as_secs_f32() / PANEL_TRANSITION.as_secs_f32())
                    .clamp(0.0, 1.0)
            })
            .unwrap_or(1.0);
        match self.state {
            PanelState::Expanded => 1.0,
            PanelState::Collapsed => 0.0,
            PanelState::Collapsing => 1.0 - progress,
            PanelState::Expanding => progress,
        }
    }
}
