//! Waveform decoding, rendering and the handle-based controller.

pub mod controller;

use std::sync::Arc;

use egui::{Color32, ColorImage};
use hound::SampleFormat;

pub use controller::{AudioDispatch, WaveformController, WaveformError, WaveformHandle, WaveformStatus};

/// Raw audio data decoded from a wav file, ready to render or play.
#[derive(Clone, Debug)]
pub struct DecodedWaveform {
    pub samples: Vec<f32>,
    pub duration_seconds: f32,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Everything a waveform handle needs once its load completes.
#[derive(Clone)]
pub struct LoadedAudio {
    pub bytes: Arc<[u8]>,
    pub image: ColorImage,
    pub duration_seconds: f32,
}

/// Renders min/max waveform columns from wav samples.
#[derive(Clone, Debug)]
pub struct WaveformRenderer {
    width: u32,
    height: u32,
    foreground: Color32,
}

impl WaveformRenderer {
    /// Create a renderer with the target image size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            foreground: Color32::from_rgb(127, 255, 212),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decode wav bytes and render them in one step.
    pub fn load(&self, bytes: Vec<u8>) -> Result<LoadedAudio, String> {
        let decoded = self.decode_from_bytes(&bytes)?;
        let image = self.render_color_image(&decoded.samples);
        Ok(LoadedAudio {
            bytes: Arc::from(bytes),
            image,
            duration_seconds: decoded.duration_seconds,
        })
    }

    /// Decode wav bytes into mono samples without rendering.
    pub fn decode_from_bytes(&self, bytes: &[u8]) -> Result<DecodedWaveform, String> {
        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes))
            .map_err(|error| format!("Invalid wav: {error}"))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;
        let samples = match spec.sample_format {
            SampleFormat::Float => Self::read_float_samples(&mut reader, channels)?,
            SampleFormat::Int => Self::read_int_samples(&mut reader, spec.bits_per_sample, channels)?,
        };
        let duration_seconds = samples.len() as f32 / spec.sample_rate.max(1) as f32;
        Ok(DecodedWaveform {
            samples,
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// Render an egui color image at the renderer's size.
    pub fn render_color_image(&self, samples: &[f32]) -> ColorImage {
        // Oversample horizontally to reduce aliasing, then combine down.
        let oversample = if self.width <= 4_096 { 4 } else { 2 };
        let oversampled = Self::sample_columns_for_width(samples, self.width * oversample);
        let columns = Self::downsample_columns(&oversampled, oversample as usize, self.width as usize);
        self.paint(&columns)
    }

    fn read_float_samples(
        reader: &mut hound::WavReader<std::io::Cursor<&[u8]>>,
        channels: usize,
    ) -> Result<Vec<f32>, String> {
        let raw: Vec<f32> = reader
            .samples::<f32>()
            .map(|s| s.map_err(|error| format!("Sample error: {error}")))
            .collect::<Result<_, _>>()?;
        Ok(Self::average_channels(raw, channels))
    }

    fn read_int_samples(
        reader: &mut hound::WavReader<std::io::Cursor<&[u8]>>,
        bits_per_sample: u16,
        channels: usize,
    ) -> Result<Vec<f32>, String> {
        let scale = (1i64 << bits_per_sample.saturating_sub(1)).max(1) as f32;
        let raw: Vec<f32> = reader
            .samples::<i32>()
            .map(|s| {
                s.map(|v| v as f32 / scale)
                    .map_err(|error| format!("Sample error: {error}"))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self::average_channels(raw, channels))
    }

    fn average_channels(raw: Vec<f32>, channels: usize) -> Vec<f32> {
        raw.chunks(channels)
            .map(|frame| frame.iter().copied().sum::<f32>() / channels as f32)
            .collect()
    }

    fn sample_columns_for_width(samples: &[f32], width: u32) -> Vec<(f32, f32)> {
        let width = width.max(1) as usize;
        if samples.is_empty() {
            return vec![(0.0, 0.0); width];
        }
        let sample_count = samples.len();
        let total = sample_count as f32;
        (0..width)
            .map(|x| {
                let start = ((x as f32 * total) / width as f32)
                    .floor()
                    .min(sample_count.saturating_sub(1) as f32) as usize;
                let end = ((((x as f32 + 1.0) * total) / width as f32).ceil() as usize)
                    .clamp(start + 1, sample_count);
                samples[start..end]
                    .iter()
                    .fold((1.0f32, -1.0f32), |(lo, hi), &sample| {
                        let clamped = sample.clamp(-1.0, 1.0);
                        (lo.min(clamped), hi.max(clamped))
                    })
            })
            .collect()
    }

    fn downsample_columns(columns: &[(f32, f32)], factor: usize, target_width: usize) -> Vec<(f32, f32)> {
        if factor <= 1 {
            return columns.to_vec();
        }
        (0..target_width.max(1))
            .map(|i| {
                let start = (i * factor).min(columns.len().saturating_sub(1));
                let end = ((i + 1) * factor).clamp(start + 1, columns.len());
                columns[start..end]
                    .iter()
                    .fold((1.0f32, -1.0f32), |(lo, hi), &(min, max)| (lo.min(min), hi.max(max)))
            })
            .collect()
    }

    fn paint(&self, columns: &[(f32, f32)]) -> ColorImage {
        let (width, height) = (self.width as usize, self.height as usize);
        let mut image = ColorImage::new([width, height], vec![Color32::TRANSPARENT; width * height]);
        let half_height = (height.saturating_sub(1)) as f32 / 2.0;
        let limit = height.saturating_sub(1) as f32;
        for (x, (min, max)) in columns.iter().enumerate().take(width) {
            let top = (half_height - max * half_height).clamp(0.0, limit).floor() as usize;
            let bottom = (half_height - min * half_height).clamp(0.0, limit).ceil() as usize;
            for y in top.min(bottom)..=bottom.max(top) {
                if let Some(pixel) = image.pixels.get_mut(y * width + x) {
                    *pixel = self.foreground;
                }
            }
        }
        image
    }
}
