//! Handle-based waveform lifecycle: create, load, play/pause, destroy.

use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use url::Url;

use super::LoadedAudio;
use crate::artifacts::{ArtifactError, RequestId};
use crate::audio::{AudioOutput, Playback};

/// Starts background audio loads.
pub trait AudioDispatch {
    /// Fetch and decode `url`; the result comes back tagged with `request_id`.
    fn dispatch_audio(&self, request_id: RequestId, url: &Url);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaveformError {
    /// The container already hosts a live handle.
    #[error("Waveform container '{0}' already has a live handle")]
    SlotInUse(String),
}

/// Lifecycle of one handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WaveformStatus {
    /// Created, nothing requested yet.
    Idle,
    Loading,
    Ready,
    /// Load failed; carries the user-facing message.
    Failed(String),
    Destroyed,
}

/// Owns the decoded waveform and playback sink for one container.
pub struct WaveformHandle {
    container: String,
    url: Option<Url>,
    pending: Option<RequestId>,
    status: WaveformStatus,
    audio: Option<LoadedAudio>,
    playback: Option<Playback>,
    playing: bool,
    played: Duration,
    resumed_at: Option<Instant>,
    texture: Option<egui::TextureHandle>,
}

impl WaveformHandle {
    fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            url: None,
            pending: None,
            status: WaveformStatus::Idle,
            audio: None,
            playback: None,
            playing: false,
            played: Duration::ZERO,
            resumed_at: None,
            texture: None,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn status(&self) -> &WaveformStatus {
        &self.status
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == WaveformStatus::Destroyed
    }

    /// Id of the load this handle is waiting on.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn image(&self) -> Option<&egui::ColorImage> {
        self.audio.as_ref().map(|audio| &audio.image)
    }

    pub fn duration_seconds(&self) -> Option<f32> {
        self.audio.as_ref().map(|audio| audio.duration_seconds)
    }

    /// Playback position as a 0-1 fraction.
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let duration = self.duration_seconds()?;
        if duration <= 0.0 {
            return None;
        }
        Some((self.elapsed(now).as_secs_f32() / duration).clamp(0.0, 1.0))
    }

    /// Texture uploaded from [`Self::image`], cached by the renderer.
    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: egui::TextureHandle) {
        if self.status == WaveformStatus::Ready {
            self.texture = Some(texture);
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .resumed_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default();
        self.played + running
    }

    fn halt(&mut self, now: Instant) {
        if let Some(playback) = &self.playback {
            playback.pause();
        }
        self.played = self.elapsed(now);
        self.resumed_at = None;
        self.playing = false;
    }

    fn rewind(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.stop();
        }
        self.played = Duration::ZERO;
        self.resumed_at = None;
        self.playing = false;
    }
}

/// Creates and drives waveform handles for one view.
///
/// Tracks which containers hold a live handle so no container is bound twice.
pub struct WaveformController {
    output: Option<Rc<AudioOutput>>,
    volume: f32,
    live: HashSet<String>,
}

impl WaveformController {
    /// `output` is `None` when no audio device is available; handles then
    /// track play state silently.
    pub fn new(output: Option<Rc<AudioOutput>>, volume: f32) -> Self {
        Self {
            output,
            volume,
            live: HashSet::new(),
        }
    }

    /// Create a handle bound to `container`.
    pub fn create(&mut self, container: &str) -> Result<WaveformHandle, WaveformError> {
        if !self.live.insert(container.to_string()) {
            return Err(WaveformError::SlotInUse(container.to_string()));
        }
        Ok(WaveformHandle::new(container))
    }

    /// Number of containers currently bound to a live handle.
    pub fn live_handles(&self) -> usize {
        self.live.len()
    }

    /// Start loading `url` into the handle. Any previous audio is released first.
    pub fn load(&mut self, handle: &mut WaveformHandle, url: Url, dispatch: &impl AudioDispatch) {
        if handle.is_destroyed() {
            return;
        }
        handle.rewind();
        handle.audio = None;
        handle.texture = None;
        let request_id = RequestId::next();
        handle.pending = Some(request_id);
        handle.status = WaveformStatus::Loading;
        debug!("Loading waveform {url} into '{}' (request {request_id})", handle.container);
        dispatch.dispatch_audio(request_id, &url);
        handle.url = Some(url);
    }

    /// Complete a load. Returns false when the result is not for this handle
    /// (stale request or destroyed handle).
    ///
    /// Failures are logged and kept as a message; the handle stays usable.
    pub fn apply_load(
        &mut self,
        handle: &mut WaveformHandle,
        request_id: RequestId,
        result: Result<LoadedAudio, ArtifactError>,
    ) -> bool {
        if handle.is_destroyed() || handle.pending != Some(request_id) {
            return false;
        }
        handle.pending = None;
        match result {
            Ok(audio) => {
                handle.audio = Some(audio);
                handle.status = WaveformStatus::Ready;
            }
            Err(err) => {
                let err = err.into_media();
                warn!(
                    "Waveform load failed for '{}' ({}): {err}",
                    handle.container,
                    handle.url.as_ref().map(Url::as_str).unwrap_or("<none>")
                );
                handle.status = WaveformStatus::Failed(err.inline_message());
            }
        }
        true
    }

    /// Toggle between playing and paused. No effect until a load has completed.
    pub fn play_pause(&mut self, handle: &mut WaveformHandle, now: Instant) {
        if handle.status != WaveformStatus::Ready {
            return;
        }
        if handle.playing {
            handle.halt(now);
            return;
        }
        if handle.playback.is_none() {
            handle.playback = self.start_playback(handle);
        } else if let Some(playback) = &handle.playback {
            playback.resume();
        }
        handle.resumed_at = Some(now);
        handle.playing = true;
    }

    /// Notice the end of playback and rewind to the start.
    pub fn tick(&mut self, handle: &mut WaveformHandle, now: Instant) {
        if !handle.playing {
            return;
        }
        let sink_done = handle
            .playback
            .as_ref()
            .is_some_and(Playback::is_finished);
        let clock_done = handle.progress(now).is_some_and(|progress| progress >= 1.0);
        if sink_done || (handle.playback.is_none() && clock_done) {
            handle.rewind();
        }
    }

    /// Pause, then release playback and rendering resources. Safe to repeat.
    pub fn destroy(&mut self, handle: &mut WaveformHandle) {
        if handle.is_destroyed() {
            return;
        }
        handle.halt(Instant::now());
        handle.rewind();
        handle.pending = None;
        handle.audio = None;
        handle.texture = None;
        handle.status = WaveformStatus::Destroyed;
        self.live.remove(&handle.container);
        debug!("Destroyed waveform '{}'", handle.container);
    }

    fn start_playback(&self, handle: &WaveformHandle) -> Option<Playback> {
        let output = self.output.as_ref()?;
        let audio = handle.audio.as_ref()?;
        match output.start(audio.bytes.clone(), self.volume) {
            Ok(playback) => Some(playback),
            Err(err) => {
                info!("Playback unavailable for '{}': {err}", handle.container);
                None
            }
        }
    }
}
