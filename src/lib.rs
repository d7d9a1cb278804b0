//! Explainability dashboard: loads attribution artifacts from a local server
//! and shows them as charts, waveforms and images.

/// Application directories.
pub mod app_dirs;
/// Artifact addressing, fetching and typed payloads.
pub mod artifacts;
/// Audio output shared by waveform handles.
pub mod audio;
/// Attribution line charts.
pub mod chart;
/// Config file and environment overrides.
pub mod config;
/// egui front end.
pub mod egui_app;
mod http_client;
/// Log setup.
pub mod logging;
/// Waveform decoding, rendering and playback handles.
pub mod waveform;
