//! Geometry for the reference networks.

use layerstack_render::{SceneGeometry, INDICES_PER_BLOCK, OUTLINE_VERTICES_PER_BLOCK};
use layerstack_testkit::{sample_state, LayoutMetric, LayoutMetricSink};

#[test]
fn default_network_geometry_counts() {
    let state = layerstack_core::NetworkState::default();
    let layout = state.layout();
    let geometry = SceneGeometry::from_layout(&layout);

    let blocks = state.layers.len();
    assert_eq!(geometry.block_ranges.len(), blocks);
    assert_eq!(geometry.block_indices.len(), blocks * INDICES_PER_BLOCK as usize);
    assert_eq!(
        geometry.line_vertices.len(),
        blocks * OUTLINE_VERTICES_PER_BLOCK + layout.lines.len() * 2
    );
}

#[test]
fn geometry_metrics_are_recorded() {
    let output_path = std::env::temp_dir().join("layerstack_scene_metrics.json");
    let sample = sample_state().layout();
    let reference = layerstack_core::NetworkState::default().layout();

    let metrics = vec![
        LayoutMetric::from_layout("sample", &sample),
        LayoutMetric::from_layout("reference", &reference),
    ];
    let mut sink = LayoutMetricSink::create(&output_path).expect("can create metrics sink");
    sink.write(&metrics).expect("can write metrics");

    let written = std::fs::read_to_string(&output_path).expect("metrics readable");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    assert_eq!(parsed[1]["blocks"].as_u64(), Some(11));
}
