use std::{
    sync::mpsc::{Receiver, Sender, TryRecvError},
    thread,
};

use egui::ColorImage;
use tracing::{debug, error};
use url::Url;

use crate::artifacts::{
    ArtifactError, ArtifactResource, FetchDispatch, Payload, RequestId, client,
    media::{self, ImageDispatch},
};
use crate::waveform::{AudioDispatch, LoadedAudio, WaveformRenderer};

/// Results coming back from the background workers.
pub(crate) enum JobMessage {
    Fetched {
        request_id: RequestId,
        result: Result<Payload, ArtifactError>,
    },
    AudioLoaded {
        request_id: RequestId,
        result: Result<LoadedAudio, ArtifactError>,
    },
    ImageLoaded {
        request_id: RequestId,
        result: Result<ColorImage, ArtifactError>,
    },
}

impl JobMessage {
    pub(crate) fn request_id(&self) -> RequestId {
        match self {
            Self::Fetched { request_id, .. }
            | Self::AudioLoaded { request_id, .. }
            | Self::ImageLoaded { request_id, .. } => *request_id,
        }
    }
}

/// Background loads for JSON, audio and image artifacts, plus the shared
/// result channel drained by the UI thread.
///
/// Each request runs on its own thread so a slow artifact never delays an
/// unrelated one.
pub(crate) struct ArtifactJobs {
    sender: JobSender,
    receiver: Receiver<JobMessage>,
}

impl ArtifactJobs {
    pub(crate) fn new(renderer: WaveformRenderer) -> Self {
        let (results, receiver) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            sender: JobSender { results, renderer },
            receiver,
        }
    }

    /// Handle for issuing requests; cheap to clone.
    pub(crate) fn sender(&self) -> &JobSender {
        &self.sender
    }

    pub(crate) fn try_recv(&self) -> Result<JobMessage, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Every result that has arrived so far.
    pub(crate) fn drain(&self) -> Vec<JobMessage> {
        let mut messages = Vec::new();
        loop {
            match self.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    error!("Artifact result channel closed unexpectedly");
                    break;
                }
            }
        }
        messages
    }
}

/// Sending side of the artifact loaders.
#[derive(Clone)]
pub(crate) struct JobSender {
    results: Sender<JobMessage>,
    renderer: WaveformRenderer,
}

impl JobSender {
    fn spawn(&self, request_id: RequestId, load: impl FnOnce() -> JobMessage + Send + 'static) {
        let results = self.results.clone();
        let spawned = thread::Builder::new()
            .name(format!("artifact-{request_id}"))
            .spawn(move || {
                if results.send(load()).is_err() {
                    debug!("Result for request {request_id} dropped; receiver gone");
                }
            });
        if let Err(err) = spawned {
            error!("Failed to start loader for request {request_id}: {err}");
        }
    }
}

impl FetchDispatch for JobSender {
    fn dispatch_fetch(&self, request_id: RequestId, resource: &ArtifactResource) {
        let url = resource.url().clone();
        self.spawn(request_id, move || {
            let result = client::get_json(&url).map(Payload::Json);
            debug!("Fetch {request_id} finished (ok: {})", result.is_ok());
            JobMessage::Fetched { request_id, result }
        });
    }
}

impl AudioDispatch for JobSender {
    fn dispatch_audio(&self, request_id: RequestId, url: &Url) {
        let url = url.clone();
        let renderer = self.renderer.clone();
        self.spawn(request_id, move || JobMessage::AudioLoaded {
            request_id,
            result: load_audio(&renderer, &url),
        });
    }
}

impl ImageDispatch for JobSender {
    fn dispatch_image(&self, request_id: RequestId, url: &Url) {
        let url = url.clone();
        self.spawn(request_id, move || JobMessage::ImageLoaded {
            request_id,
            result: media::load_image(&url),
        });
    }
}

fn load_audio(renderer: &WaveformRenderer, url: &Url) -> Result<LoadedAudio, ArtifactError> {
    let bytes = client::get_bytes(url, client::MAX_MEDIA_BYTES).map_err(ArtifactError::into_media)?;
    renderer
        .load(bytes)
        .map_err(|message| ArtifactError::MediaLoad(format!("{url}: {message}")))
}
