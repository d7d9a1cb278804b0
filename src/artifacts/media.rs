//! Image artifacts: fetching and decoding into egui pixels.

use egui::ColorImage;
use url::Url;

use super::{ArtifactError, RequestId, client};

/// Starts background image loads.
pub trait ImageDispatch {
    fn dispatch_image(&self, request_id: RequestId, url: &Url);
}

/// Fetch and decode an image. Every failure is reported as [`ArtifactError::MediaLoad`].
pub fn load_image(url: &Url) -> Result<ColorImage, ArtifactError> {
    let bytes = client::get_bytes(url, client::MAX_MEDIA_BYTES).map_err(ArtifactError::into_media)?;
    decode_image(&bytes).map_err(|err| match err {
        ArtifactError::MediaLoad(message) => ArtifactError::MediaLoad(format!("{url}: {message}")),
        other => other,
    })
}

/// Decode PNG bytes into an RGBA image.
pub fn decode_image(bytes: &[u8]) -> Result<ColorImage, ArtifactError> {
    let image = image::load_from_memory(bytes)
        .map_err(|err| ArtifactError::MediaLoad(format!("image decode failed: {err}")))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}
