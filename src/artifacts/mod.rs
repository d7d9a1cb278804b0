//! Artifact server access: resource addressing, fetch state and typed payloads.

pub mod client;
mod error;
pub mod fetch;
pub mod labels;
pub mod media;
mod resource;
pub mod series;

use std::sync::atomic::{AtomicU64, Ordering};

pub use error::{ArtifactError, ErrorKind};
pub use fetch::{FetchDispatch, FetchState, FromArtifact, MediaUrl, Payload, ResourceFetcher};
pub use labels::{LabelEntry, LabelMapping};
pub use resource::{ArtifactKind, ArtifactResource, ArtifactServer, paths};
pub use series::AttributionSeries;

/// Process-unique identifier attached to every background request.
///
/// Results carry the id back so owners can drop answers to requests they no
/// longer care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Allocate the next id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
