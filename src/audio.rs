//! Audio output shared by every waveform handle.

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use thiserror::Error;

/// Errors raised while opening the output or starting playback.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audio init failed: {0}")]
    Init(#[from] rodio::StreamError),
    #[error("Audio decode failed: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Default output device; each handle opens its own sink on it.
pub struct AudioOutput {
    stream: OutputStream,
}

impl AudioOutput {
    /// Open the system default output device.
    pub fn open_default() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        Ok(Self { stream })
    }

    /// Decode `bytes` and start playing them on a fresh sink.
    pub fn start(&self, bytes: Arc<[u8]>, volume: f32) -> Result<Playback, AudioError> {
        let source = Decoder::new(Cursor::new(bytes))?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(source);
        sink.play();
        Ok(Playback { sink })
    }
}

/// One playing (or paused) audio buffer.
pub struct Playback {
    sink: Sink,
}

impl Playback {
    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn resume(&self) {
        self.sink.play();
    }

    /// True once every queued sample has been played.
    pub fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    pub fn stop(self) {
        self.sink.stop();
    }
}
