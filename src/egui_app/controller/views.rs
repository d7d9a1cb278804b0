//! Per-section views: what each page fetches, owns and tears down.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use egui::{ColorImage, TextureHandle, Vec2};
use tracing::{debug, error, info, warn};

use super::jobs::JobMessage;
use crate::artifacts::{
    ArtifactError, ArtifactKind, ArtifactResource, ArtifactServer, AttributionSeries,
    FetchDispatch, FetchState, LabelMapping, MediaUrl, RequestId, ResourceFetcher,
    media::ImageDispatch, paths,
};
use crate::audio::AudioOutput;
use crate::chart::{ChartController, ChartError, ChartHandle};
use crate::egui_app::state::CollapsiblePanel;
use crate::waveform::{AudioDispatch, WaveformController, WaveformHandle};

/// Slot name of the single statistics chart on a page.
pub const STATISTICS_SLOT: &str = "statistics";

/// Outcome of routing one job result to a view: `None` when nothing on the
/// page was waiting for it.
pub type Applied = Option<Result<(), ArtifactError>>;

/// Everything a page can dispatch.
pub trait ViewDispatch: FetchDispatch + AudioDispatch + ImageDispatch {}

impl<T: FetchDispatch + AudioDispatch + ImageDispatch> ViewDispatch for T {}

/// Explanation methods with a page of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Shap,
    Lime,
    Lrp,
    IntegratedGradients,
}

struct AudioSpec {
    container: &'static str,
    title: &'static str,
    path: &'static str,
}

const ORIGINAL_AUDIO: AudioSpec = AudioSpec {
    container: "original",
    title: "Original audio",
    path: paths::INPUT_AUDIO,
};

const LIME_AUDIO: AudioSpec = AudioSpec {
    container: "explanation",
    title: "Explanation audio",
    path: paths::LIME_EXPLANATION_AUDIO,
};

const LIME_SLOTS: &[AudioSpec] = &[ORIGINAL_AUDIO, LIME_AUDIO];
const SINGLE_SLOT: &[AudioSpec] = &[ORIGINAL_AUDIO];

impl Method {
    pub fn title(self) -> &'static str {
        match self {
            Method::Shap => "SHAP",
            Method::Lime => "LIME",
            Method::Lrp => "LRP",
            Method::IntegratedGradients => "Integrated Gradients",
        }
    }

    fn attributions(self) -> Option<&'static str> {
        match self {
            Method::Shap => Some(paths::SHAP_ATTRIBUTIONS),
            Method::Lime => None,
            Method::Lrp => Some(paths::LRP_ATTRIBUTIONS),
            Method::IntegratedGradients => Some(paths::IG_ATTRIBUTIONS),
        }
    }

    fn audio(self) -> &'static [AudioSpec] {
        match self {
            Method::Lime => LIME_SLOTS,
            _ => SINGLE_SLOT,
        }
    }

    /// Heat map and spectrogram paths.
    fn images(self) -> Option<(&'static str, &'static str)> {
        match self {
            Method::Lrp => Some((paths::LRP_HEAT_MAP, paths::LRP_SPECTROGRAM)),
            Method::IntegratedGradients => Some((paths::IG_HEAT_MAP, paths::IG_SPECTROGRAM)),
            Method::Shap | Method::Lime => None,
        }
    }
}

/// One waveform container on a page.
pub struct AudioSlot {
    container: &'static str,
    title: &'static str,
    source: ResourceFetcher<MediaUrl>,
    handle: Option<WaveformHandle>,
    error: Option<String>,
}

impl AudioSlot {
    fn new(spec: &AudioSpec, server: &ArtifactServer) -> Result<Self, ArtifactError> {
        Ok(Self {
            container: spec.container,
            title: spec.title,
            source: ResourceFetcher::new(server.resource(spec.path, ArtifactKind::Audio)?),
            handle: None,
            error: None,
        })
    }

    pub fn container(&self) -> &str {
        self.container
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn handle(&self) -> Option<&WaveformHandle> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut WaveformHandle> {
        self.handle.as_mut()
    }

    /// Failure to bind the container, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The failure as shown inline on the page.
    pub fn inline_error(&self) -> Option<String> {
        self.error().map(|message| format!("Error: {message}"))
    }

    fn fail(&mut self, err: &impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    fn reset(&mut self) {
        self.source = ResourceFetcher::new(self.source.resource().clone());
        self.handle = None;
        self.error = None;
    }
}

/// Which image of a pair is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageChoice {
    HeatMap,
    Spectrogram,
}

/// One image artifact and its decoded pixels.
pub struct ImageSlot {
    title: &'static str,
    resource: ArtifactResource,
    request: Option<RequestId>,
    state: FetchState<ColorImage>,
    texture: Option<TextureHandle>,
}

impl ImageSlot {
    fn new(title: &'static str, path: &str, server: &ArtifactServer) -> Result<Self, ArtifactError> {
        Ok(Self {
            title,
            resource: server.resource(path, ArtifactKind::Image)?,
            request: None,
            state: FetchState::Loading,
            texture: None,
        })
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn state(&self) -> &FetchState<ColorImage> {
        &self.state
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: TextureHandle) {
        if self.state.ready().is_some() {
            self.texture = Some(texture);
        }
    }

    fn activate(&mut self, dispatch: &impl ImageDispatch) {
        let request_id = RequestId::next();
        self.state = FetchState::Loading;
        self.texture = None;
        self.request = Some(request_id);
        dispatch.dispatch_image(request_id, self.resource.url());
    }

    fn apply(&mut self, result: Result<ColorImage, ArtifactError>) -> Result<(), ArtifactError> {
        self.request = None;
        let result = result.map_err(ArtifactError::into_media);
        let outcome = match &result {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!("Image {} failed: {err}", self.resource.url());
                Err(err.clone())
            }
        };
        self.state.settle(result);
        outcome
    }

    fn reset(&mut self) {
        self.request = None;
        self.state = FetchState::Loading;
        self.texture = None;
    }
}

/// Heat map / spectrogram pair with a local toggle.
pub struct ImagePair {
    heat_map: ImageSlot,
    spectrogram: ImageSlot,
    showing: ImageChoice,
}

impl ImagePair {
    pub fn showing(&self) -> ImageChoice {
        self.showing
    }

    /// Switch between the two images. Nothing is refetched.
    pub fn toggle(&mut self) {
        self.showing = match self.showing {
            ImageChoice::HeatMap => ImageChoice::Spectrogram,
            ImageChoice::Spectrogram => ImageChoice::HeatMap,
        };
    }

    pub fn slot(&self, choice: ImageChoice) -> &ImageSlot {
        match choice {
            ImageChoice::HeatMap => &self.heat_map,
            ImageChoice::Spectrogram => &self.spectrogram,
        }
    }

    pub fn current(&self) -> &ImageSlot {
        self.slot(self.showing)
    }

    pub fn current_mut(&mut self) -> &mut ImageSlot {
        match self.showing {
            ImageChoice::HeatMap => &mut self.heat_map,
            ImageChoice::Spectrogram => &mut self.spectrogram,
        }
    }

    fn slots_mut(&mut self) -> [&mut ImageSlot; 2] {
        [&mut self.heat_map, &mut self.spectrogram]
    }
}

/// Collapsible sections of an explanation page.
#[derive(Clone, Debug)]
pub struct ExplanationPanels {
    pub statistics: CollapsiblePanel,
    pub audio: CollapsiblePanel,
    pub image: CollapsiblePanel,
}

impl Default for ExplanationPanels {
    fn default() -> Self {
        Self {
            statistics: CollapsiblePanel::new("Statistics"),
            audio: CollapsiblePanel::new("Audio"),
            image: CollapsiblePanel::new("Image"),
        }
    }
}

impl ExplanationPanels {
    fn all_mut(&mut self) -> [&mut CollapsiblePanel; 3] {
        [&mut self.statistics, &mut self.audio, &mut self.image]
    }

    fn any_transitioning(&self) -> bool {
        [&self.statistics, &self.audio, &self.image]
            .iter()
            .any(|panel| panel.is_transitioning())
    }
}

/// A SHAP, LIME, LRP or Integrated Gradients page.
///
/// Owns its fetchers, chart and waveform handles. Nothing is cached across
/// activations: [`ExplanationView::deactivate`] releases every handle and
/// forgets every result.
pub struct ExplanationView {
    method: Method,
    active: bool,
    attributions: Option<ResourceFetcher<Arc<AttributionSeries>>>,
    charts: ChartController,
    waveforms: WaveformController,
    audio: Vec<AudioSlot>,
    images: Option<ImagePair>,
    panels: ExplanationPanels,
}

impl ExplanationView {
    pub fn new(
        method: Method,
        server: &ArtifactServer,
        output: Option<Rc<AudioOutput>>,
        volume: f32,
    ) -> Result<Self, ArtifactError> {
        let attributions = method
            .attributions()
            .map(|path| server.resource(path, ArtifactKind::Json).map(ResourceFetcher::new))
            .transpose()?;
        let audio = method
            .audio()
            .iter()
            .map(|spec| AudioSlot::new(spec, server))
            .collect::<Result<Vec<_>, _>>()?;
        let images = method
            .images()
            .map(|(heat_map, spectrogram)| {
                Ok::<_, ArtifactError>(ImagePair {
                    heat_map: ImageSlot::new("Attribution heat map", heat_map, server)?,
                    spectrogram: ImageSlot::new("Spectrogram", spectrogram, server)?,
                    showing: ImageChoice::HeatMap,
                })
            })
            .transpose()?;
        Ok(Self {
            method,
            active: false,
            attributions,
            charts: ChartController::new(),
            waveforms: WaveformController::new(output, volume),
            audio,
            images,
            panels: ExplanationPanels::default(),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mount the page: start every fetch, then bind and load each waveform.
    pub fn activate(&mut self, dispatch: &impl ViewDispatch) {
        if self.active {
            return;
        }
        self.active = true;
        self.panels = ExplanationPanels::default();
        if let Some(fetcher) = &mut self.attributions {
            fetcher.activate(dispatch);
        }
        if let Some(images) = &mut self.images {
            for slot in images.slots_mut() {
                slot.activate(dispatch);
            }
        }
        for slot in &mut self.audio {
            slot.source.activate(dispatch);
            let mut handle = match self.waveforms.create(slot.container) {
                Ok(handle) => handle,
                Err(err) => {
                    error!("{} page: {err}", self.method.title());
                    slot.fail(&err);
                    continue;
                }
            };
            match slot.source.state() {
                FetchState::Ready(MediaUrl(url)) => {
                    self.waveforms.load(&mut handle, url.clone(), dispatch);
                }
                FetchState::Error(err) => slot.error = Some(err.to_string()),
                FetchState::Loading => {}
            }
            slot.handle = Some(handle);
        }
        info!("{} page activated", self.method.title());
    }

    /// Unmount the page: destroy every chart and waveform handle and drop all
    /// fetch state. Results still in flight are ignored afterwards.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.charts.destroy_all();
        for slot in &mut self.audio {
            if let Some(handle) = &mut slot.handle {
                self.waveforms.destroy(handle);
            }
            slot.reset();
        }
        if let Some(fetcher) = &mut self.attributions {
            *fetcher = ResourceFetcher::new(fetcher.resource().clone());
        }
        if let Some(images) = &mut self.images {
            for slot in images.slots_mut() {
                slot.reset();
            }
        }
        debug!("{} page deactivated", self.method.title());
    }

    /// Route a worker result to whatever on this page is waiting for it.
    pub(crate) fn apply(&mut self, message: JobMessage) -> Applied {
        if !self.active {
            return None;
        }
        match message {
            JobMessage::Fetched { request_id, result } => {
                let fetcher = self.attributions.as_mut()?;
                if !fetcher.apply(request_id, result) {
                    return None;
                }
                Some(fetcher.state().error().cloned().map_or(Ok(()), Err))
            }
            JobMessage::AudioLoaded { request_id, result } => {
                let handle = self
                    .audio
                    .iter_mut()
                    .filter_map(|slot| slot.handle.as_mut())
                    .find(|handle| handle.pending_request() == Some(request_id))?;
                let failure = result.as_ref().err().map(|err| err.clone().into_media());
                if !self.waveforms.apply_load(handle, request_id, result) {
                    return None;
                }
                Some(failure.map_or(Ok(()), Err))
            }
            JobMessage::ImageLoaded { request_id, result } => {
                let slot = self
                    .images
                    .as_mut()?
                    .slots_mut()
                    .into_iter()
                    .find(|slot| slot.request == Some(request_id))?;
                Some(slot.apply(result))
            }
        }
    }

    pub fn attributions(&self) -> Option<&FetchState<Arc<AttributionSeries>>> {
        self.attributions.as_ref().map(ResourceFetcher::state)
    }

    /// Fetch the attributions again after a failure.
    pub fn retry_attributions(&mut self, dispatch: &impl FetchDispatch) {
        if !self.active {
            return;
        }
        self.charts.destroy(STATISTICS_SLOT);
        if let Some(fetcher) = &mut self.attributions {
            fetcher.retry(dispatch);
        }
    }

    /// Chart for the statistics slot at `size`, built once the attributions
    /// are ready. `None` while loading, after an error, or on pages without
    /// attributions.
    pub fn sync_chart(&mut self, size: Vec2) -> Option<Result<&ChartHandle, ChartError>> {
        let series = self.attributions.as_ref()?.state().ready()?.clone();
        Some(self.charts.sync(STATISTICS_SLOT, &series, size))
    }

    pub fn chart(&self) -> Option<&ChartHandle> {
        self.charts.handle(STATISTICS_SLOT)
    }

    pub fn audio_slots(&self) -> &[AudioSlot] {
        &self.audio
    }

    pub fn audio_slots_mut(&mut self) -> &mut [AudioSlot] {
        &mut self.audio
    }

    /// Play or pause the waveform in slot `index`.
    pub fn toggle_playback(&mut self, index: usize, now: Instant) {
        if let Some(handle) = self.audio.get_mut(index).and_then(|slot| slot.handle.as_mut()) {
            self.waveforms.play_pause(handle, now);
        }
    }

    pub fn images(&self) -> Option<&ImagePair> {
        self.images.as_ref()
    }

    pub fn images_mut(&mut self) -> Option<&mut ImagePair> {
        self.images.as_mut()
    }

    pub fn panels(&self) -> &ExplanationPanels {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut ExplanationPanels {
        &mut self.panels
    }

    pub fn live_charts(&self) -> usize {
        self.charts.live_handles()
    }

    pub fn live_waveforms(&self) -> usize {
        self.waveforms.live_handles()
    }

    /// Advance panel timers and playback end detection.
    pub fn tick(&mut self, now: Instant) {
        for panel in self.panels.all_mut() {
            panel.tick(now);
        }
        for handle in self.audio.iter_mut().filter_map(|slot| slot.handle.as_mut()) {
            self.waveforms.tick(handle, now);
        }
    }

    /// True while something on the page still changes without input.
    pub fn is_busy(&self) -> bool {
        let fetching = self
            .attributions
            .as_ref()
            .is_some_and(|fetcher| fetcher.pending_request().is_some());
        let images = self.images.as_ref().is_some_and(|pair| {
            pair.heat_map.request.is_some() || pair.spectrogram.request.is_some()
        });
        let audio = self.audio.iter().filter_map(AudioSlot::handle).any(|handle| {
            handle.is_playing() || handle.pending_request().is_some()
        });
        fetching || images || audio || self.panels.any_transitioning()
    }
}

impl Drop for ExplanationView {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Model information page: the class label table.
pub struct ModelInfoView {
    labels: ResourceFetcher<LabelMapping>,
    active: bool,
    panel: CollapsiblePanel,
}

impl ModelInfoView {
    pub fn new(server: &ArtifactServer) -> Result<Self, ArtifactError> {
        Ok(Self {
            labels: ResourceFetcher::new(server.resource(paths::LABELS, ArtifactKind::Json)?),
            active: false,
            panel: CollapsiblePanel::new("Labels"),
        })
    }

    pub fn activate(&mut self, dispatch: &impl FetchDispatch) {
        if self.active {
            return;
        }
        self.active = true;
        self.panel = CollapsiblePanel::new("Labels");
        self.labels.activate(dispatch);
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.labels = ResourceFetcher::new(self.labels.resource().clone());
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn apply(&mut self, message: JobMessage) -> Applied {
        let JobMessage::Fetched { request_id, result } = message else {
            return None;
        };
        if !self.active || !self.labels.apply(request_id, result) {
            return None;
        }
        Some(self.labels.state().error().cloned().map_or(Ok(()), Err))
    }

    pub fn labels(&self) -> &FetchState<LabelMapping> {
        self.labels.state()
    }

    pub fn retry(&mut self, dispatch: &impl FetchDispatch) {
        if self.active {
            self.labels.retry(dispatch);
        }
    }

    pub fn panel(&self) -> &CollapsiblePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut CollapsiblePanel {
        &mut self.panel
    }

    pub fn tick(&mut self, now: Instant) {
        self.panel.tick(now);
    }

    pub fn is_busy(&self) -> bool {
        self.labels.pending_request().is_some() || self.panel.is_transitioning()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::Payload;
    use crate::egui_app::controller::test_support::{
        RecordingJobs, local_server, tiny_audio, tiny_image,
    };
    use crate::waveform::WaveformStatus;
    use serde_json::json;

    const SIZE: Vec2 = Vec2::new(400.0, 200.0);

    fn view(method: Method) -> ExplanationView {
        ExplanationView::new(method, &local_server(), None, 1.0).unwrap()
    }

    fn fetched(request_id: RequestId, body: serde_json::Value) -> JobMessage {
        JobMessage::Fetched {
            request_id,
            result: Ok(Payload::Json(body)),
        }
    }

    #[test]
    fn lrp_mount_requests_every_artifact_once() {
        let jobs = RecordingJobs::default();
        let mut lrp = view(Method::Lrp);
        lrp.activate(&jobs);
        assert!(jobs.fetch_for(paths::LRP_ATTRIBUTIONS).is_some());
        assert!(jobs.audio_for(paths::INPUT_AUDIO).is_some());
        assert!(jobs.image_for(paths::LRP_HEAT_MAP).is_some());
        assert!(jobs.image_for(paths::LRP_SPECTROGRAM).is_some());
        assert_eq!(jobs.total(), 4);
        assert!(lrp.attributions().unwrap().is_loading());
        assert!(lrp.sync_chart(SIZE).is_none());
        assert_eq!(lrp.live_waveforms(), 1);
    }

    #[test]
    fn chart_renders_once_attributions_are_ready() {
        let jobs = RecordingJobs::default();
        let mut lrp = view(Method::Lrp);
        lrp.activate(&jobs);
        let request = jobs.fetch_for(paths::LRP_ATTRIBUTIONS).unwrap();
        let applied = lrp.apply(fetched(request, json!({"attributions": [0.1, -0.2, 0.05]})));
        assert_eq!(applied, Some(Ok(())));
        let chart = lrp.sync_chart(SIZE).unwrap().unwrap();
        assert_eq!(chart.points().len(), 3);
        assert_eq!(chart.labels(), vec!["0", "1", "2"]);
    }

    #[test]
    fn deactivate_releases_handles_and_ignores_late_results() {
        let jobs = RecordingJobs::default();
        let mut lrp = view(Method::Lrp);
        lrp.activate(&jobs);
        let fetch = jobs.fetch_for(paths::LRP_ATTRIBUTIONS).unwrap();
        let audio = jobs.audio_for(paths::INPUT_AUDIO).unwrap();
        lrp.apply(fetched(fetch, json!({"attributions": [1.0, 2.0]})));
        lrp.sync_chart(SIZE);
        assert_eq!(lrp.live_charts(), 1);

        lrp.deactivate();
        assert_eq!(lrp.live_charts(), 0);
        assert_eq!(lrp.live_waveforms(), 0);
        assert!(lrp.audio_slots()[0].handle().is_none());
        let late = JobMessage::AudioLoaded {
            request_id: audio,
            result: Ok(tiny_audio()),
        };
        assert_eq!(lrp.apply(late), None);

        lrp.activate(&jobs);
        assert!(lrp.attributions().unwrap().is_loading());
        assert_ne!(jobs.fetch_for(paths::LRP_ATTRIBUTIONS), Some(fetch));
    }

    #[test]
    fn lime_has_two_waveforms_and_no_chart() {
        let jobs = RecordingJobs::default();
        let mut lime = view(Method::Lime);
        lime.activate(&jobs);
        assert!(lime.attributions().is_none());
        assert!(jobs.fetches.borrow().is_empty());
        let containers: Vec<_> = lime.audio_slots().iter().map(AudioSlot::container).collect();
        assert_eq!(containers, vec!["original", "explanation"]);
        assert!(jobs.audio_for(paths::LIME_EXPLANATION_AUDIO).is_some());
        assert!(lime.sync_chart(SIZE).is_none());
    }

    #[test]
    fn malformed_attributions_show_error_and_no_chart() {
        let jobs = RecordingJobs::default();
        let mut shap = view(Method::Shap);
        shap.activate(&jobs);
        let request = jobs.fetch_for(paths::SHAP_ATTRIBUTIONS).unwrap();
        let applied = shap.apply(fetched(request, json!({"values": [1]})));
        assert!(matches!(applied, Some(Err(ArtifactError::MalformedData(_)))));
        assert!(shap.sync_chart(SIZE).is_none());
        assert_eq!(shap.live_charts(), 0);
    }

    #[test]
    fn audio_failure_does_not_block_chart() {
        let jobs = RecordingJobs::default();
        let mut shap = view(Method::Shap);
        shap.activate(&jobs);
        let audio = jobs.audio_for(paths::INPUT_AUDIO).unwrap();
        let failed = shap.apply(JobMessage::AudioLoaded {
            request_id: audio,
            result: Err(ArtifactError::MediaLoad("not a wav".into())),
        });
        assert!(matches!(failed, Some(Err(ArtifactError::MediaLoad(_)))));
        let status = shap.audio_slots()[0].handle().unwrap().status().clone();
        assert!(matches!(status, WaveformStatus::Failed(_)));

        let request = jobs.fetch_for(paths::SHAP_ATTRIBUTIONS).unwrap();
        shap.apply(fetched(request, json!({"attributions": [0.3]})));
        assert!(shap.sync_chart(SIZE).unwrap().is_ok());
    }

    #[test]
    fn audio_slot_error_is_prefixed_once() {
        let jobs = RecordingJobs::default();
        let mut lime = view(Method::Lime);
        lime.activate(&jobs);
        let slot = &mut lime.audio[1];
        assert_eq!(slot.inline_error(), None);
        slot.fail(&ArtifactError::Status {
            url: "http://127.0.0.1:9000/lime/explanation.wav".into(),
            status: 404,
        });
        assert_eq!(slot.error(), Some("HTTP error! status: 404"));
        assert_eq!(
            slot.inline_error().as_deref(),
            Some("Error: HTTP error! status: 404")
        );
    }

    #[test]
    fn image_toggle_is_local() {
        let jobs = RecordingJobs::default();
        let mut ig = view(Method::IntegratedGradients);
        ig.activate(&jobs);
        let heat_map = jobs.image_for(paths::IG_HEAT_MAP).unwrap();
        let applied = ig.apply(JobMessage::ImageLoaded {
            request_id: heat_map,
            result: Ok(tiny_image()),
        });
        assert_eq!(applied, Some(Ok(())));
        let before = jobs.total();
        let images = ig.images_mut().unwrap();
        assert_eq!(images.showing(), ImageChoice::HeatMap);
        assert!(images.current().state().ready().is_some());
        images.toggle();
        assert_eq!(images.showing(), ImageChoice::Spectrogram);
        assert!(images.current().state().is_loading());
        assert_eq!(jobs.total(), before);
    }

    #[test]
    fn model_info_builds_sorted_table() {
        let jobs = RecordingJobs::default();
        let mut info = ModelInfoView::new(&local_server()).unwrap();
        info.activate(&jobs);
        let request = jobs.fetch_for(paths::LABELS).unwrap();
        let applied = info.apply(fetched(request, json!({"jazz": 1, "blues": 0})));
        assert_eq!(applied, Some(Ok(())));
        let labels = info.labels().ready().unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.entries()[0].class_name, "blues");
    }
}
