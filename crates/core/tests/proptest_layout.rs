//! Property-based tests for the layer stack layout
//!
//! Validates layout invariants:
//! - Blocks stay in list order along +Z with exactly `gap` between them
//! - Total length is the channel extents plus the gaps
//! - Extents follow `ln(dim + 1) * multiplier`
//! - Explicit colors always beat the legend

use layerstack_core::{
    layout_network, visual_extent, ColorMap, Layer, LabelKind, LineKind, Rgb, VisualParams,
};
use layerstack_testkit::sample_layers;
use proptest::prelude::*;

fn layer_strategy() -> impl Strategy<Value = Layer> {
    (
        "[A-Za-z. ]{0,12}",
        1u32..5000,
        1u32..5000,
        1u32..5000,
        proptest::option::of(0u32..=0xFF_FFFF),
    )
        .prop_map(|(name, h, w, c, color)| Layer {
            name,
            h,
            w,
            c,
            color: color.map(Rgb),
        })
}

fn params_strategy() -> impl Strategy<Value = VisualParams> {
    (
        0.1f32..10.0,
        0.1f32..10.0,
        0.5f32..3.0,
        0.5f32..3.0,
        0.5f32..3.0,
        any::<bool>(),
    )
        .prop_map(|(gap, label_distance, hm, wm, cm, names)| VisualParams {
            gap,
            label_distance,
            height_multiplier: hm,
            width_multiplier: wm,
            channel_multiplier: cm,
            show_name_labels: names,
            ..VisualParams::default()
        })
}

fn tolerance(scale: f32) -> f32 {
    1e-4 * scale.abs().max(1.0)
}

proptest! {
    /// Property: consecutive blocks are separated by exactly `gap`
    #[test]
    fn blocks_are_ordered_and_gapped(
        layers in prop::collection::vec(layer_strategy(), 1..24),
        params in params_strategy(),
    ) {
        let layout = layout_network(&layers, &ColorMap::default(), &params);
        prop_assert_eq!(layout.blocks.len(), layers.len());

        for (index, pair) in layout.blocks.windows(2).enumerate() {
            let spacing = pair[1].z_start() - pair[0].z_end();
            prop_assert!(
                (spacing - params.gap).abs() <= tolerance(pair[1].z_start()),
                "spacing {} between blocks {} and {} differs from gap {}",
                spacing, index, index + 1, params.gap
            );
            prop_assert!(pair[1].center.z > pair[0].center.z);
        }

        let first = &layout.blocks[0];
        prop_assert!(first.z_start().abs() <= 1e-5);
    }

    /// Property: total length is the sum of channel extents plus the gaps
    #[test]
    fn total_length_matches_extents(
        layers in prop::collection::vec(layer_strategy(), 1..24),
        params in params_strategy(),
    ) {
        let layout = layout_network(&layers, &ColorMap::default(), &params);
        let channels: f32 = layers
            .iter()
            .map(|layer| visual_extent(layer.c, params.channel_multiplier))
            .sum();
        let expected = channels + (layers.len() - 1) as f32 * params.gap;

        prop_assert!(
            (layout.total_length - expected).abs() <= tolerance(expected),
            "total length {} differs from {}",
            layout.total_length, expected
        );
        let last = layout.blocks.last().unwrap();
        prop_assert!((last.z_end() - layout.total_length).abs() <= tolerance(expected));
    }

    /// Property: block sizes are log-scaled dimensions
    #[test]
    fn extents_are_log_scaled(
        layer in layer_strategy(),
        params in params_strategy(),
    ) {
        let layout = layout_network(std::slice::from_ref(&layer), &ColorMap::default(), &params);
        let size = layout.blocks[0].size;
        prop_assert_eq!(size.x, ((layer.w as f32) + 1.0).ln() * params.width_multiplier);
        prop_assert_eq!(size.y, ((layer.h as f32) + 1.0).ln() * params.height_multiplier);
        prop_assert_eq!(size.z, ((layer.c as f32) + 1.0).ln() * params.channel_multiplier);
        prop_assert_eq!(layout.blocks[0].center.x, 0.0);
        prop_assert_eq!(layout.blocks[0].center.y, 0.0);
    }

    /// Property: label and line counts follow the name-label toggle
    #[test]
    fn label_counts_follow_toggle(
        layers in prop::collection::vec(layer_strategy(), 1..24),
        params in params_strategy(),
    ) {
        let layout = layout_network(&layers, &ColorMap::default(), &params);
        let per_block = if params.show_name_labels { 2 } else { 1 };
        prop_assert_eq!(layout.labels.len(), layers.len() * per_block);

        let callouts = layout.lines.iter().filter(|l| l.kind == LineKind::Callout).count();
        let connectors = layout.lines.iter().filter(|l| l.kind == LineKind::Connector).count();
        prop_assert_eq!(callouts, layers.len() * per_block);
        prop_assert_eq!(connectors, layers.len() - 1);

        for label in &layout.labels {
            let block = &layout.blocks[label.block];
            let half_h = block.size.y / 2.0;
            match label.kind {
                LabelKind::Dimensions => {
                    prop_assert!((label.anchor.y + half_h + params.label_distance).abs() <= 1e-4)
                }
                LabelKind::Name => {
                    prop_assert!((label.anchor.y - half_h - params.label_distance).abs() <= 1e-4)
                }
            }
            prop_assert_eq!(label.anchor.z, block.center.z);
        }
    }

    /// Property: an explicit color is always used verbatim
    #[test]
    fn explicit_color_wins(
        layer in layer_strategy(),
        color in 0u32..=0xFF_FFFF,
    ) {
        let layer = layer.with_color(Rgb(color));
        prop_assert_eq!(layer.resolve_color(&ColorMap::default()), Rgb(color));
        prop_assert_eq!(layer.resolve_color(&ColorMap::empty()), Rgb(color));
    }

    /// Property: a name containing a legend key takes that key's color
    #[test]
    fn legend_substring_match_is_case_insensitive(
        prefix in "[0-9 ._]{0,6}",
        suffix in "[0-9 ._]{0,6}",
        upper in any::<bool>(),
    ) {
        let key = if upper { "DENSE" } else { "dense" };
        let mut legend = ColorMap::empty();
        legend.insert("Dense", Rgb(0x123456));
        let layer = Layer::new(format!("{prefix}{key}{suffix}"), 1, 1, 1);
        prop_assert_eq!(layer.resolve_color(&legend), Rgb(0x123456));
    }
}

#[test]
fn sample_network_lays_out_with_defaults() {
    let layout = layout_network(
        &sample_layers(),
        &ColorMap::default(),
        &VisualParams::default(),
    );
    assert_eq!(layout.blocks.len(), 3);
    assert_eq!(layout.labels.len(), 6);
    assert_eq!(layout.lines.len(), 8);
    layerstack_testkit::assert_close(
        layout.center_z(),
        layout.total_length / 2.0,
    );
}
