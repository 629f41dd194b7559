#![warn(missing_docs)]
//! Shared fixtures and assertions for layerstack tests.

use anyhow::Result;
use layerstack_core::{Layer, NetworkLayout, NetworkState, Rgb};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Tolerance used by the float assertions below.
pub const EPSILON: f32 = 1e-4;

/// Three small layers covering the legend, fallback and explicit color paths.
pub fn sample_layers() -> Vec<Layer> {
    vec![
        Layer::new("stem.conv", 32, 32, 16),
        Layer::new("Dropout", 16, 16, 16),
        Layer::new("head.fc", 1, 1, 10).with_color(Rgb(0x336699)),
    ]
}

/// Default state with [`sample_layers`] in place of the built-in network.
pub fn sample_state() -> NetworkState {
    NetworkState {
        layers: sample_layers(),
        ..NetworkState::default()
    }
}

/// Assert two floats agree within [`EPSILON`].
#[track_caller]
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Unique path under the system temp directory.
pub fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("{prefix}-{nanos}.{extension}"))
}

/// Summary of one layout for CI artifacts.
#[derive(Debug, Serialize)]
pub struct LayoutMetric {
    /// Fixture name.
    pub name: String,
    /// Number of blocks.
    pub blocks: usize,
    /// Number of labels.
    pub labels: usize,
    /// Number of callouts plus connectors.
    pub lines: usize,
    /// Stack length along Z.
    pub total_length: f32,
}

impl LayoutMetric {
    /// Summarize `layout` under `name`.
    pub fn from_layout(name: impl Into<String>, layout: &NetworkLayout) -> Self {
        Self {
            name: name.into(),
            blocks: layout.blocks.len(),
            labels: layout.labels.len(),
            lines: layout.lines.len(),
            total_length: layout.total_length,
        }
    }
}

/// Writes layout metrics to JSON.
pub struct LayoutMetricSink {
    file: File,
}

impl LayoutMetricSink {
    /// Create a sink pointed at the supplied path, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the provided metrics as pretty JSON.
    pub fn write(&mut self, metrics: &[LayoutMetric]) -> Result<()> {
        let json = serde_json::to_string_pretty(metrics)?;
        self.file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_metric_sink_writes_file() {
        let path = temp_path("layout-metrics", "json");
        let layout = sample_state().layout();
        let metrics = vec![LayoutMetric::from_layout("sample", &layout)];
        let mut sink = LayoutMetricSink::create(&path).expect("sink create");
        sink.write(&metrics).expect("write succeeds");
        let contents = fs::read_to_string(&path).expect("file readable");
        assert!(contents.contains("\"sample\""));
        assert!(contents.contains("total_length"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn sample_layers_cover_color_paths() {
        let state = sample_state();
        let colors: Vec<_> = state
            .layers
            .iter()
            .map(|layer| layer.resolve_color(&state.legend))
            .collect();
        assert_eq!(colors, [Rgb(0xF4B400), Rgb::FALLBACK, Rgb(0x336699)]);
    }
}
