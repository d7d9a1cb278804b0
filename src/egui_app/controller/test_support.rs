use std::cell::RefCell;

use url::Url;

use crate::artifacts::{
    ArtifactResource, ArtifactServer, FetchDispatch, RequestId, media::ImageDispatch,
};
use crate::config::ArtifactServerConfig;
use crate::waveform::AudioDispatch;

/// Records every dispatched job instead of running it.
#[derive(Default)]
pub(crate) struct RecordingJobs {
    pub(crate) fetches: RefCell<Vec<(RequestId, Url)>>,
    pub(crate) audio: RefCell<Vec<(RequestId, Url)>>,
    pub(crate) images: RefCell<Vec<(RequestId, Url)>>,
}

impl RecordingJobs {
    pub(crate) fn fetch_for(&self, path: &str) -> Option<RequestId> {
        find(&self.fetches, path)
    }

    pub(crate) fn audio_for(&self, path: &str) -> Option<RequestId> {
        find(&self.audio, path)
    }

    pub(crate) fn image_for(&self, path: &str) -> Option<RequestId> {
        find(&self.images, path)
    }

    pub(crate) fn total(&self) -> usize {
        self.fetches.borrow().len() + self.audio.borrow().len() + self.images.borrow().len()
    }
}

/// Latest request whose URL path is `path`.
fn find(log: &RefCell<Vec<(RequestId, Url)>>, path: &str) -> Option<RequestId> {
    log.borrow()
        .iter()
        .rev()
        .find(|(_, url)| url.path() == path)
        .map(|(id, _)| *id)
}

impl FetchDispatch for RecordingJobs {
    fn dispatch_fetch(&self, request_id: RequestId, resource: &ArtifactResource) {
        self.fetches
            .borrow_mut()
            .push((request_id, resource.url().clone()));
    }
}

impl AudioDispatch for RecordingJobs {
    fn dispatch_audio(&self, request_id: RequestId, url: &Url) {
        self.audio.borrow_mut().push((request_id, url.clone()));
    }
}

impl ImageDispatch for RecordingJobs {
    fn dispatch_image(&self, request_id: RequestId, url: &Url) {
        self.images.borrow_mut().push((request_id, url.clone()));
    }
}

pub(crate) fn local_server() -> ArtifactServer {
    match ArtifactServer::from_config(&ArtifactServerConfig::default()) {
        Ok(server) => server,
        Err(err) => panic!("default server config is invalid: {err}"),
    }
}

pub(crate) fn tiny_image() -> egui::ColorImage {
    egui::ColorImage::new([2, 2], vec![egui::Color32::RED; 4])
}

pub(crate) fn tiny_audio() -> crate::waveform::LoadedAudio {
    crate::waveform::LoadedAudio {
        bytes: std::sync::Arc::from(Vec::new()),
        image: tiny_image(),
        duration_seconds: 1.0,
    }
}
