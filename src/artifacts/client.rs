//! Blocking GET helpers run on worker threads.

use url::Url;

use super::ArtifactError;
use crate::http_client;

/// Upper bound for JSON artifact bodies.
pub const MAX_JSON_BYTES: usize = 16 * 1024 * 1024;
/// Upper bound for audio and image artifact bodies.
pub const MAX_MEDIA_BYTES: usize = 64 * 1024 * 1024;

/// Fetch raw bytes, mapping non-success statuses to [`ArtifactError::Status`].
pub fn get_bytes(url: &Url, max_bytes: usize) -> Result<Vec<u8>, ArtifactError> {
    let response = http_client::agent()
        .get(url.as_str())
        .call()
        .map_err(|err| map_request_error(url, err))?;
    http_client::read_response_bytes(response, max_bytes).map_err(|err| {
        ArtifactError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    })
}

/// Fetch and parse a JSON body. Parse failures become [`ArtifactError::MalformedData`].
pub fn get_json(url: &Url) -> Result<serde_json::Value, ArtifactError> {
    let bytes = get_bytes(url, MAX_JSON_BYTES)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ArtifactError::MalformedData(format!("{url} is not valid JSON: {err}")))
}

fn map_request_error(url: &Url, err: ureq::Error) -> ArtifactError {
    match err {
        ureq::Error::Status(status, _) => ArtifactError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => ArtifactError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}
