//! Layer-to-geometry layout.
//!
//! Layers are stacked along +Z in list order. Each block is centered on the
//! Z axis; its extents are `ln(dim + 1)` scaled by the matching multiplier.

use glam::Vec3;
use serde::Serialize;

use crate::color::{ColorMap, Rgb};
use crate::layer::Layer;
use crate::params::VisualParams;

/// Logarithmic extent of one dimension.
pub fn visual_extent(dim: u32, multiplier: f32) -> f32 {
    (dim as f32 + 1.0).ln() * multiplier
}

/// A placed, colored box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Position of the source layer in the list.
    pub index: usize,
    /// Box center.
    pub center: Vec3,
    /// Full extents (width, height, channels) along X, Y, Z.
    pub size: Vec3,
    /// Resolved fill color.
    pub color: Rgb,
    /// Fill alpha.
    pub opacity: f32,
}

impl Block {
    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        self.center + self.size * 0.5
    }

    /// Front face along the stack axis.
    pub fn z_start(&self) -> f32 {
        self.center.z - self.size.z * 0.5
    }

    /// Back face along the stack axis.
    pub fn z_end(&self) -> f32 {
        self.center.z + self.size.z * 0.5
    }
}

/// Which text a label carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelKind {
    /// Layer name, above the block.
    Name,
    /// `HxWxC`, below the block.
    Dimensions,
}

/// Text anchored to a point in the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    /// Owning block.
    pub block: usize,
    /// Name or dimensions.
    pub kind: LabelKind,
    /// Display text.
    pub text: String,
    /// World-space anchor; text is centered on its projection.
    pub anchor: Vec3,
}

/// What a line segment connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    /// Block face to label.
    Callout,
    /// Previous block to the next one.
    Connector,
}

/// A straight segment in world space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    /// Role of the segment.
    pub kind: LineKind,
    /// First endpoint.
    pub start: Vec3,
    /// Second endpoint.
    pub end: Vec3,
    /// Stroke color.
    pub color: Rgb,
}

/// Everything the renderer and the label overlay need for one network.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NetworkLayout {
    /// One block per layer, in layer order.
    pub blocks: Vec<Block>,
    /// Name and dimension labels.
    pub labels: Vec<Label>,
    /// Callouts and connectors.
    pub lines: Vec<LineSegment>,
    /// Distance from the first block's front face to the last block's back face.
    pub total_length: f32,
}

impl NetworkLayout {
    /// Midpoint of the stack along Z; the camera orbits around it.
    pub fn center_z(&self) -> f32 {
        self.total_length / 2.0
    }
}

/// Lay out `layers` as a stack of boxes with labels and connecting lines.
pub fn layout_network(layers: &[Layer], legend: &ColorMap, params: &VisualParams) -> NetworkLayout {
    let mut layout = NetworkLayout {
        blocks: Vec::with_capacity(layers.len()),
        labels: Vec::with_capacity(layers.len() * 2),
        lines: Vec::with_capacity(layers.len() * 3),
        total_length: 0.0,
    };

    let callout = params.callout_length();
    let mut current_z = 0.0_f32;

    for (index, layer) in layers.iter().enumerate() {
        let size = Vec3::new(
            visual_extent(layer.w, params.width_multiplier),
            visual_extent(layer.h, params.height_multiplier),
            visual_extent(layer.c, params.channel_multiplier),
        );
        let center_z = current_z + size.z / 2.0;
        let half_h = size.y / 2.0;

        layout.labels.push(Label {
            block: index,
            kind: LabelKind::Dimensions,
            text: layer.dimension_label(),
            anchor: Vec3::new(0.0, -half_h - params.label_distance, center_z),
        });
        layout.lines.push(LineSegment {
            kind: LineKind::Callout,
            start: Vec3::new(0.0, -half_h, center_z),
            end: Vec3::new(0.0, -half_h - callout, center_z),
            color: Rgb::CALLOUT,
        });

        if params.show_name_labels {
            layout.labels.push(Label {
                block: index,
                kind: LabelKind::Name,
                text: layer.name.clone(),
                anchor: Vec3::new(0.0, half_h + params.label_distance, center_z),
            });
            layout.lines.push(LineSegment {
                kind: LineKind::Callout,
                start: Vec3::new(0.0, half_h, center_z),
                end: Vec3::new(0.0, half_h + callout, center_z),
                color: Rgb::CALLOUT,
            });
        }

        let block = Block {
            index,
            center: Vec3::new(0.0, 0.0, center_z),
            size,
            color: layer.resolve_color(legend),
            opacity: params.block_opacity,
        };

        if let Some(previous) = layout.blocks.last() {
            layout.lines.push(LineSegment {
                kind: LineKind::Connector,
                start: Vec3::new(0.0, 0.0, previous.z_end()),
                end: Vec3::new(0.0, 0.0, block.z_start()),
                color: Rgb::CALLOUT,
            });
        }

        layout.blocks.push(block);

        current_z += size.z + params.gap;
    }

    if !layers.is_empty() {
        layout.total_length = current_z - params.gap;
    }

    tracing::debug!(
        blocks = layout.blocks.len(),
        labels = layout.labels.len(),
        lines = layout.lines.len(),
        total_length = layout.total_length,
        "network laid out"
    );

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::default_layers;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn extents_are_log_scaled() {
        assert_eq!(visual_extent(0, 1.5), 0.0);
        assert!(approx(visual_extent(1, 1.0), std::f32::consts::LN_2));
        assert!(approx(visual_extent(2448, 1.5), (2449.0f32).ln() * 1.5));
    }

    #[test]
    fn blocks_are_stacked_with_gap() {
        let layers = vec![Layer::new("a", 1, 1, 1), Layer::new("b", 1, 1, 3)];
        let params = VisualParams::default();
        let layout = layout_network(&layers, &ColorMap::default(), &params);

        let c0 = visual_extent(1, 1.5);
        let c1 = visual_extent(3, 1.5);
        assert!(approx(layout.blocks[0].center.z, c0 / 2.0));
        assert!(approx(layout.blocks[1].center.z, c0 + params.gap + c1 / 2.0));
        assert!(approx(layout.total_length, c0 + params.gap + c1));
        assert!(approx(
            layout.blocks[1].z_start() - layout.blocks[0].z_end(),
            params.gap
        ));
    }

    #[test]
    fn connector_spans_the_gap() {
        let layers = vec![Layer::new("a", 4, 4, 4), Layer::new("b", 2, 2, 2)];
        let layout = layout_network(&layers, &ColorMap::default(), &VisualParams::default());
        let connectors: Vec<_> = layout
            .lines
            .iter()
            .filter(|line| line.kind == LineKind::Connector)
            .collect();
        assert_eq!(connectors.len(), 1);
        assert!(approx(connectors[0].start.z, layout.blocks[0].z_end()));
        assert!(approx(connectors[0].end.z, layout.blocks[1].z_start()));
        assert_eq!(connectors[0].start.y, 0.0);
    }

    #[test]
    fn labels_and_callouts_sit_above_and_below() {
        let layers = vec![Layer::new("self.conv1", 42, 77, 8)];
        let params = VisualParams::default();
        let layout = layout_network(&layers, &ColorMap::default(), &params);
        let half_h = visual_extent(42, 1.5) / 2.0;

        let dims = &layout.labels[0];
        assert_eq!(dims.kind, LabelKind::Dimensions);
        assert_eq!(dims.text, "42x77x8");
        assert!(approx(dims.anchor.y, -half_h - 3.0));

        let name = &layout.labels[1];
        assert_eq!(name.kind, LabelKind::Name);
        assert_eq!(name.text, "self.conv1");
        assert!(approx(name.anchor.y, half_h + 3.0));

        let callouts: Vec<_> = layout
            .lines
            .iter()
            .filter(|line| line.kind == LineKind::Callout)
            .collect();
        assert_eq!(callouts.len(), 2);
        assert!(approx(callouts[0].end.y, -half_h - 2.8));
        assert!(approx(callouts[1].end.y, half_h + 2.8));
    }

    #[test]
    fn hiding_name_labels_drops_their_callouts() {
        let params = VisualParams {
            show_name_labels: false,
            ..VisualParams::default()
        };
        let layout = layout_network(&default_layers(), &ColorMap::default(), &params);
        assert_eq!(layout.labels.len(), 11);
        assert!(layout.labels.iter().all(|l| l.kind == LabelKind::Dimensions));
        // 11 dimension callouts + 10 connectors.
        assert_eq!(layout.lines.len(), 21);
    }

    #[test]
    fn blocks_take_resolved_colors_and_opacity() {
        let layers = vec![
            Layer::new("Input (x)", 1, 1, 1),
            Layer::new("Dropout", 1, 1, 1),
            Layer::new("self.fc1", 1, 1, 1).with_color(Rgb(0x112233)),
        ];
        let params = VisualParams {
            block_opacity: 0.5,
            ..VisualParams::default()
        };
        let layout = layout_network(&layers, &ColorMap::default(), &params);
        assert_eq!(layout.blocks[0].color, Rgb(0x4285F4));
        assert_eq!(layout.blocks[1].color, Rgb::FALLBACK);
        assert_eq!(layout.blocks[2].color, Rgb(0x112233));
        assert!(layout.blocks.iter().all(|b| b.opacity == 0.5));
    }

    #[test]
    fn empty_network_has_zero_length() {
        let layout = layout_network(&[], &ColorMap::default(), &VisualParams::default());
        assert!(layout.blocks.is_empty());
        assert_eq!(layout.total_length, 0.0);
        assert_eq!(layout.center_z(), 0.0);
    }

    #[test]
    fn stack_spans_zero_to_total_length() {
        let layout = layout_network(
            &default_layers(),
            &ColorMap::default(),
            &VisualParams::default(),
        );
        let first = &layout.blocks[0];
        let last = &layout.blocks[layout.blocks.len() - 1];
        assert!(approx(first.min().z, 0.0));
        assert!(approx(last.max().z, layout.total_length));
        // The input layer is the widest and tallest block.
        assert!(approx(first.max().x, visual_extent(320, 1.5) / 2.0));
        assert!(approx(first.max().y, visual_extent(180, 1.5) / 2.0));
    }
}
