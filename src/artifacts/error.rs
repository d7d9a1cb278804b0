use thiserror::Error;

/// Failure to obtain or interpret one artifact.
///
/// Every variant is recovered at the fetcher or controller boundary and shown
/// inline in place of the dependent chart, waveform or image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// The server answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Status { url: String, status: u16 },
    /// The request never produced a response.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// An artifact path could not be resolved against the base URL.
    #[error("Invalid artifact path '{path}': {message}")]
    InvalidUrl { path: String, message: String },
    /// The body arrived but does not have the expected shape.
    #[error("Malformed data: {0}")]
    MalformedData(String),
    /// Audio or image bytes could not be loaded or decoded.
    #[error("Media load failed: {0}")]
    MediaLoad(String),
}

/// Coarse error taxonomy used for presentation and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkError,
    MalformedDataError,
    MediaLoadError,
}

impl ArtifactError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { .. } | Self::Transport { .. } | Self::InvalidUrl { .. } => {
                ErrorKind::NetworkError
            }
            Self::MalformedData(_) => ErrorKind::MalformedDataError,
            Self::MediaLoad(_) => ErrorKind::MediaLoadError,
        }
    }

    /// Re-tag a network failure that happened while loading media.
    pub fn into_media(self) -> Self {
        match self {
            Self::MediaLoad(_) => self,
            other => Self::MediaLoad(other.to_string()),
        }
    }

    /// Message shown in place of the failed block.
    pub fn inline_message(&self) -> String {
        format!("Error: {self}")
    }
}
