use std::rc::Rc;
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use super::jobs::JobMessage;
use super::views::{Applied, ExplanationView, Method, ModelInfoView, ViewDispatch};
use crate::artifacts::{ArtifactError, ArtifactServer};
use crate::audio::AudioOutput;
use crate::egui_app::state::Section;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Unknown section '{0}'")]
    UnknownSection(String),
    #[error("Section '{section}' could not be built: {source}")]
    Resource {
        section: Section,
        source: ArtifactError,
    },
}

/// The page currently on screen.
pub enum ActiveView {
    Home,
    Explanation(ExplanationView),
    ModelInfo(ModelInfoView),
}

impl ActiveView {
    fn build(
        section: Section,
        server: &ArtifactServer,
        output: Option<Rc<AudioOutput>>,
        volume: f32,
    ) -> Result<Self, ArtifactError> {
        let method = match section {
            Section::Home => return Ok(Self::Home),
            Section::ModelInfo => return ModelInfoView::new(server).map(Self::ModelInfo),
            Section::Shap => Method::Shap,
            Section::Lime => Method::Lime,
            Section::Lrp => Method::Lrp,
            Section::IntegratedGradients => Method::IntegratedGradients,
        };
        ExplanationView::new(method, server, output, volume).map(Self::Explanation)
    }

    fn activate(&mut self, dispatch: &impl ViewDispatch) {
        match self {
            Self::Home => {}
            Self::Explanation(view) => view.activate(dispatch),
            Self::ModelInfo(view) => view.activate(dispatch),
        }
    }

    fn deactivate(&mut self) {
        match self {
            Self::Home => {}
            Self::Explanation(view) => view.deactivate(),
            Self::ModelInfo(view) => view.deactivate(),
        }
    }
}

/// Maps section identifiers to the active view.
///
/// Exactly one view is alive at a time; switching tears the old one down
/// before the new one starts fetching.
pub struct SectionRouter {
    server: ArtifactServer,
    output: Option<Rc<AudioOutput>>,
    volume: f32,
    current: Section,
    view: ActiveView,
}

impl SectionRouter {
    /// Start on the home page.
    pub fn new(server: ArtifactServer, output: Option<Rc<AudioOutput>>, volume: f32) -> Self {
        Self {
            server,
            output,
            volume,
            current: Section::Home,
            view: ActiveView::Home,
        }
    }

    pub fn current(&self) -> Section {
        self.current
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ActiveView {
        &mut self.view
    }

    pub fn server(&self) -> &ArtifactServer {
        &self.server
    }

    /// Switch to the section named `identifier`. Returns false when it is
    /// already current. On error the current view stays active.
    pub fn select(&mut self, identifier: &str, dispatch: &impl ViewDispatch) -> Result<bool, RouteError> {
        let section: Section = identifier
            .parse()
            .map_err(RouteError::UnknownSection)?;
        if section == self.current {
            return Ok(false);
        }
        let mut next = ActiveView::build(section, &self.server, self.output.clone(), self.volume)
            .map_err(|source| RouteError::Resource { section, source })?;
        self.view.deactivate();
        next.activate(dispatch);
        self.view = next;
        info!("Section {} -> {section}", self.current);
        self.current = section;
        Ok(true)
    }

    /// Hand a worker result to the active view.
    pub(crate) fn poll(&mut self, message: JobMessage) -> Applied {
        match &mut self.view {
            ActiveView::Home => None,
            ActiveView::Explanation(view) => view.apply(message),
            ActiveView::ModelInfo(view) => view.apply(message),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        match &mut self.view {
            ActiveView::Home => {}
            ActiveView::Explanation(view) => view.tick(now),
            ActiveView::ModelInfo(view) => view.tick(now),
        }
    }

    pub fn is_busy(&self) -> bool {
        match &self.view {
            ActiveView::Home => false,
            ActiveView::Explanation(view) => view.is_busy(),
            ActiveView::ModelInfo(view) => view.is_busy(),
        }
    }
}
