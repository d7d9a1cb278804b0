use url::Url;

use super::ArtifactError;
use crate::config::{ArtifactServerConfig, ConfigError};

/// Artifact paths published by the analysis pipeline.
pub mod paths {
    pub const LABELS: &str = "/labels.json";
    pub const SHAP_ATTRIBUTIONS: &str = "/shap_attributions.json";
    pub const LRP_ATTRIBUTIONS: &str = "/lrp/lrp_attributions.json";
    pub const IG_ATTRIBUTIONS: &str = "/integrated_gradients/ig_attributions.json";
    pub const INPUT_AUDIO: &str = "/input.wav";
    pub const LIME_EXPLANATION_AUDIO: &str = "/lime/explanation.wav";
    pub const LRP_HEAT_MAP: &str = "/lrp/lrp_attribution_heat_map.png";
    pub const LRP_SPECTROGRAM: &str = "/lrp/lrp_spectogram.png";
    pub const IG_HEAT_MAP: &str = "/integrated_gradients/ig_attribution_heat_map.png";
    pub const IG_SPECTROGRAM: &str = "/integrated_gradients/ig_spectogram.png";
}

/// What an artifact contains, which decides how it is fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Json,
    Audio,
    Image,
}

impl ArtifactKind {
    /// Binary media is handed to its consumer by URL instead of being fetched here.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Audio | Self::Image)
    }
}

/// One fetchable artifact, addressed by absolute URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArtifactResource {
    url: Url,
    kind: ArtifactKind,
}

impl ArtifactResource {
    pub fn new(url: Url, kind: ArtifactKind) -> Self {
        Self { url, kind }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}

/// Base URL of the artifact server shared by every view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactServer {
    base: Url,
}

impl ArtifactServer {
    /// Wrap a base URL; a trailing slash is added so relative joins keep any path prefix.
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base }
    }

    /// Build the server address from configuration.
    pub fn from_config(config: &ArtifactServerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.base_url()?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an artifact path such as `/labels.json`.
    pub fn resource(&self, path: &str, kind: ArtifactKind) -> Result<ArtifactResource, ArtifactError> {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ArtifactError::InvalidUrl {
                path: path.to_string(),
                message: err.to_string(),
            })?;
        Ok(ArtifactResource::new(url, kind))
    }
}
