//! Maintains app state and bridges the artifact engine to the egui UI.

pub(crate) mod jobs;
pub mod router;
#[cfg(test)]
pub(crate) mod test_support;
pub mod views;

use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::artifacts::ArtifactServer;
use crate::audio::AudioOutput;
use crate::config::{AppConfig, ConfigError};
use crate::egui_app::state::{AlertList, AlertTone, Section};
use crate::waveform::WaveformRenderer;
use jobs::ArtifactJobs;
pub use router::{ActiveView, RouteError, SectionRouter};
pub use views::{ExplanationView, ImageChoice, Method, ModelInfoView};

/// Width in pixels of rendered waveform images.
pub const WAVEFORM_WIDTH: u32 = 1_024;

/// Owns the router, the background workers and the alert list.
pub struct EguiController {
    router: SectionRouter,
    jobs: ArtifactJobs,
    alerts: AlertList,
}

impl EguiController {
    /// `output` is `None` when audio could not be opened; playback is then silent.
    pub fn new(config: &AppConfig, output: Option<Rc<AudioOutput>>) -> Result<Self, ConfigError> {
        let server = ArtifactServer::from_config(&config.artifact_server)?;
        let renderer = WaveformRenderer::new(WAVEFORM_WIDTH, config.waveform.height);
        Ok(Self {
            router: SectionRouter::new(server, output, config.waveform.volume),
            jobs: ArtifactJobs::new(renderer),
            alerts: AlertList::default(),
        })
    }

    pub fn current_section(&self) -> Section {
        self.router.current()
    }

    /// Navigate to a section by identifier. Failures are also raised as alerts.
    pub fn select_section(&mut self, identifier: &str) -> Result<bool, RouteError> {
        let result = self.router.select(identifier, self.jobs.sender());
        if let Err(err) = &result {
            warn!("Section change rejected: {err}");
            self.alerts.push(AlertTone::Warning, err.to_string());
        }
        result
    }

    /// Route finished background work to the active view. Returns how many
    /// results were applied; stale ones are dropped.
    pub fn poll_jobs(&mut self) -> usize {
        let mut applied = 0;
        for message in self.jobs.drain() {
            let request_id = message.request_id();
            match self.router.poll(message) {
                None => debug!("Dropped stale result for request {request_id}"),
                Some(Ok(())) => applied += 1,
                Some(Err(err)) => {
                    applied += 1;
                    self.alerts.push(AlertTone::Error, err.to_string());
                }
            }
        }
        applied
    }

    /// Advance timers on the active view.
    pub fn tick(&mut self, now: Instant) {
        self.router.tick(now);
    }

    /// Fetch the active page's JSON again.
    pub fn retry(&mut self) {
        let sender = self.jobs.sender();
        match self.router.view_mut() {
            ActiveView::Explanation(view) => view.retry_attributions(sender),
            ActiveView::ModelInfo(view) => view.retry(sender),
            ActiveView::Home => {}
        }
    }

    /// True while the UI should keep repainting without input.
    pub fn is_busy(&self) -> bool {
        self.router.is_busy()
    }

    pub fn view(&self) -> &ActiveView {
        self.router.view()
    }

    pub fn view_mut(&mut self) -> &mut ActiveView {
        self.router.view_mut()
    }

    pub fn alerts(&self) -> &AlertList {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut AlertList {
        &mut self.alerts
    }

    pub fn server(&self) -> &ArtifactServer {
        self.router.server()
    }
}
