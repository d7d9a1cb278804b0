//! Tri-state loading of a single artifact.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use super::{ArtifactError, ArtifactResource, RequestId};

/// Loading state of one artifact.
///
/// Moves only `Loading -> Error` or `Loading -> Ready`; a new request starts
/// over at `Loading`.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Error(ArtifactError),
    Ready(T),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ArtifactError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Settle a loading state. Returns false (and changes nothing) when already settled.
    pub fn settle(&mut self, result: Result<T, ArtifactError>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Error(err),
        };
        true
    }
}

/// Raw result of a fetch before typing.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Parsed JSON body.
    Json(serde_json::Value),
    /// Media URL handed through to the consuming controller.
    Url(Url),
}

/// Conversion from a fetched payload into the value a view consumes.
pub trait FromArtifact: Sized {
    fn from_payload(payload: Payload) -> Result<Self, ArtifactError>;
}

impl FromArtifact for serde_json::Value {
    fn from_payload(payload: Payload) -> Result<Self, ArtifactError> {
        match payload {
            Payload::Json(value) => Ok(value),
            Payload::Url(url) => Err(ArtifactError::MalformedData(format!(
                "{url} is a media artifact, expected JSON"
            ))),
        }
    }
}

impl<T: FromArtifact> FromArtifact for Arc<T> {
    fn from_payload(payload: Payload) -> Result<Self, ArtifactError> {
        T::from_payload(payload).map(Arc::new)
    }
}

/// URL of a binary artifact, passed through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaUrl(pub Url);

impl FromArtifact for MediaUrl {
    fn from_payload(payload: Payload) -> Result<Self, ArtifactError> {
        match payload {
            Payload::Url(url) => Ok(Self(url)),
            Payload::Json(_) => Err(ArtifactError::MalformedData(
                "expected a media URL, got a JSON body".into(),
            )),
        }
    }
}

/// Starts background requests for JSON artifacts.
pub trait FetchDispatch {
    /// Issue one GET for `resource`; the result comes back tagged with `request_id`.
    fn dispatch_fetch(&self, request_id: RequestId, resource: &ArtifactResource);
}

/// Loads one artifact and tracks its [`FetchState`].
#[derive(Debug)]
pub struct ResourceFetcher<T> {
    resource: ArtifactResource,
    request: Option<RequestId>,
    state: FetchState<T>,
}

impl<T: FromArtifact> ResourceFetcher<T> {
    /// Create an idle fetcher. Nothing is requested until [`Self::activate`].
    pub fn new(resource: ArtifactResource) -> Self {
        Self {
            resource,
            request: None,
            state: FetchState::Loading,
        }
    }

    pub fn resource(&self) -> &ArtifactResource {
        &self.resource
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Id of the request whose answer this fetcher is waiting for.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.request.filter(|_| self.state.is_loading())
    }

    /// Start loading: state becomes `Loading` before the request is issued.
    ///
    /// Media resources resolve immediately to their URL without a request.
    pub fn activate(&mut self, dispatch: &impl FetchDispatch) {
        let request_id = RequestId::next();
        self.state = FetchState::Loading;
        self.request = Some(request_id);
        if self.resource.kind().is_media() {
            let payload = Payload::Url(self.resource.url().clone());
            self.apply(request_id, Ok(payload));
            return;
        }
        debug!(
            "Fetching {} (request {request_id})",
            self.resource.url()
        );
        dispatch.dispatch_fetch(request_id, &self.resource);
    }

    /// Discard the current result and fetch again.
    pub fn retry(&mut self, dispatch: &impl FetchDispatch) {
        self.activate(dispatch);
    }

    /// Point the fetcher at a new resource; refetches only when it actually changed.
    pub fn set_resource(&mut self, resource: ArtifactResource, dispatch: &impl FetchDispatch) -> bool {
        if resource == self.resource {
            return false;
        }
        self.resource = resource;
        self.activate(dispatch);
        true
    }

    /// Forget the in-flight request so a late answer cannot land.
    pub fn cancel(&mut self) {
        self.request = None;
    }

    /// Accept a result if it answers the pending request.
    ///
    /// Returns false for stale or duplicate results.
    pub fn apply(&mut self, request_id: RequestId, result: Result<Payload, ArtifactError>) -> bool {
        if self.pending_request() != Some(request_id) {
            return false;
        }
        let typed = result.and_then(T::from_payload);
        if let Err(err) = &typed {
            warn!("Artifact {} failed: {err}", self.resource.url());
        }
        self.state.settle(typed)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingDispatch;
    use super::*;
    use crate::artifacts::{ArtifactKind, ArtifactServer, AttributionSeries, paths};
    use crate::config::ArtifactServerConfig;
    use serde_json::json;

    fn server() -> ArtifactServer {
        ArtifactServer::from_config(&ArtifactServerConfig::default()).unwrap()
    }

    fn shap_fetcher() -> ResourceFetcher<Arc<AttributionSeries>> {
        let resource = server()
            .resource(paths::SHAP_ATTRIBUTIONS, ArtifactKind::Json)
            .unwrap();
        ResourceFetcher::new(resource)
    }

    #[test]
    fn activation_is_loading_with_one_request() {
        let dispatch = RecordingDispatch::default();
        let mut fetcher = shap_fetcher();
        fetcher.activate(&dispatch);
        assert!(fetcher.state().is_loading());
        assert_eq!(dispatch.count(), 1);
        assert_eq!(fetcher.pending_request(), dispatch.last());
    }

    #[test]
    fn ready_payload_becomes_series() {
        let dispatch = RecordingDispatch::default();
        let mut fetcher = shap_fetcher();
        fetcher.activate(&dispatch);
        let id = dispatch.last().unwrap();
        assert!(fetcher.apply(id, Ok(Payload::Json(json!({"attributions": [0.5, 1.5]})))));
        let series = fetcher.state().ready().unwrap();
        assert_eq!(series.values(), &[0.5, 1.5]);
        assert_eq!(fetcher.pending_request(), None);
    }

    #[test]
    fn missing_attributions_is_error() {
        let dispatch = RecordingDispatch::default();
        let mut fetcher = shap_fetcher();
        fetcher.activate(&dispatch);
        let id = dispatch.last().unwrap();
        fetcher.apply(id, Ok(Payload::Json(json!({"scores": [1]}))));
        assert!(matches!(
            fetcher.state(),
            FetchState::Error(ArtifactError::MalformedData(_))
        ));
    }

    #[test]
    fn settled_state_ignores_duplicates_and_stale_ids() {
        let dispatch = RecordingDispatch::default();
        let mut fetcher = shap_fetcher();
        fetcher.activate(&dispatch);
        let first = dispatch.last().unwrap();
        fetcher.retry(&dispatch);
        let second = dispatch.last().unwrap();
        assert_ne!(first, second);

        let stale = Ok(Payload::Json(json!({"attributions": [9.0]})));
        assert!(!fetcher.apply(first, stale));
        assert!(fetcher.state().is_loading());

        let err = ArtifactError::Status {
            url: "x".into(),
            status: 500,
        };
        assert!(fetcher.apply(second, Err(err)));
        let late = Ok(Payload::Json(json!({"attributions": [1.0]})));
        assert!(!fetcher.apply(second, late));
        assert!(fetcher.state().error().is_some());
    }

    #[test]
    fn cancel_drops_late_results() {
        let dispatch = RecordingDispatch::default();
        let mut fetcher = shap_fetcher();
        fetcher.activate(&dispatch);
        let id = dispatch.last().unwrap();
        fetcher.cancel();
        assert!(!fetcher.apply(id, Ok(Payload::Json(json!({"attributions": []})))));
        assert!(fetcher.state().is_loading());
    }

    #[test]
    fn refetches_only_on_identity_change() {
        let dispatch = RecordingDispatch::default();
        let mut fetcher = shap_fetcher();
        fetcher.activate(&dispatch);
        let same = fetcher.resource().clone();
        assert!(!fetcher.set_resource(same, &dispatch));
        assert_eq!(dispatch.count(), 1);

        let moved = ArtifactServer::new(url::Url::parse("http://localhost:9100/").unwrap())
            .resource(paths::SHAP_ATTRIBUTIONS, ArtifactKind::Json)
            .unwrap();
        assert!(fetcher.set_resource(moved, &dispatch));
        assert_eq!(dispatch.count(), 2);
        assert!(fetcher.state().is_loading());
    }

    #[test]
    fn media_resolves_to_url_without_request() {
        let dispatch = RecordingDispatch::default();
        let resource = server()
            .resource(paths::INPUT_AUDIO, ArtifactKind::Audio)
            .unwrap();
        let mut fetcher: ResourceFetcher<MediaUrl> = ResourceFetcher::new(resource.clone());
        fetcher.activate(&dispatch);
        assert_eq!(dispatch.count(), 0);
        assert_eq!(
            fetcher.state().ready(),
            Some(&MediaUrl(resource.url().clone()))
        );
    }
}
