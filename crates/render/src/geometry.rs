//! CPU-side scene geometry built from a [`NetworkLayout`].
//!
//! Boxes become flat-shaded triangles with one index range per block so they
//! can be drawn in back-to-front order. Box outlines, callouts and connectors
//! become one line list.

use glam::Vec3;
use std::ops::Range;

use layerstack_core::{Block, NetworkLayout, Rgb};

/// Vertex of a translucent box face.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockVertex {
    /// World position.
    pub position: [f32; 3],
    /// Outward face normal.
    pub normal: [f32; 3],
    /// Linear RGB plus opacity.
    pub color: [f32; 4],
}

impl BlockVertex {
    /// Vertex buffer layout matching `block.wgsl`.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    /// Layout descriptor for pipeline creation.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertex of a line segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// World position.
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
}

impl LineVertex {
    /// Vertex buffer layout matching `line.wgsl`.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Layout descriptor for pipeline creation.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Index range and sort key of one box.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRange {
    /// Layer index of the block.
    pub block: usize,
    /// Box center used for depth sorting.
    pub center: Vec3,
    /// Slice of the index buffer holding this box.
    pub indices: Range<u32>,
}

/// Geometry for one network, ready to upload.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    /// Face vertices of every box.
    pub block_vertices: Vec<BlockVertex>,
    /// Triangle indices into `block_vertices`.
    pub block_indices: Vec<u32>,
    /// Per-box index ranges in layer order.
    pub block_ranges: Vec<BlockRange>,
    /// Line list: box outlines, then callouts and connectors.
    pub line_vertices: Vec<LineVertex>,
}

/// Faces as (normal, u, v) with `u x v = normal`, so corners listed
/// (-,-) (+,-) (+,+) (-,+) wind counter-clockwise seen from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

const CORNER_SIGNS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Box corners indexed by bit pattern: bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Indices per box: six quads of two triangles.
pub const INDICES_PER_BLOCK: u32 = 36;
/// Line vertices per box outline.
pub const OUTLINE_VERTICES_PER_BLOCK: usize = 24;

impl SceneGeometry {
    /// Build geometry for every block and line of `layout`.
    pub fn from_layout(layout: &NetworkLayout) -> Self {
        let mut geometry = Self {
            block_vertices: Vec::with_capacity(layout.blocks.len() * 24),
            block_indices: Vec::with_capacity(layout.blocks.len() * INDICES_PER_BLOCK as usize),
            block_ranges: Vec::with_capacity(layout.blocks.len()),
            line_vertices: Vec::with_capacity(
                layout.blocks.len() * OUTLINE_VERTICES_PER_BLOCK + layout.lines.len() * 2,
            ),
        };

        for block in &layout.blocks {
            geometry.push_box(block);
            geometry.push_outline(block);
        }

        for line in &layout.lines {
            let color = line.color.to_linear();
            geometry.line_vertices.push(LineVertex {
                position: line.start.to_array(),
                color,
            });
            geometry.line_vertices.push(LineVertex {
                position: line.end.to_array(),
                color,
            });
        }

        geometry
    }

    fn push_box(&mut self, block: &Block) {
        let half = block.size * 0.5;
        let [r, g, b] = block.color.to_linear();
        let color = [r, g, b, block.opacity];
        let first_index = self.block_indices.len() as u32;

        for (normal, u, v) in FACES {
            let base = self.block_vertices.len() as u32;
            for (su, sv) in CORNER_SIGNS {
                let offset = (normal + u * su + v * sv) * half;
                self.block_vertices.push(BlockVertex {
                    position: (block.center + offset).to_array(),
                    normal: normal.to_array(),
                    color,
                });
            }
            self.block_indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        self.block_ranges.push(BlockRange {
            block: block.index,
            center: block.center,
            indices: first_index..self.block_indices.len() as u32,
        });
    }

    fn push_outline(&mut self, block: &Block) {
        let min = block.min();
        let max = block.max();
        let corner = |bits: usize| {
            Vec3::new(
                if bits & 1 == 0 { min.x } else { max.x },
                if bits & 2 == 0 { min.y } else { max.y },
                if bits & 4 == 0 { min.z } else { max.z },
            )
        };
        let color = Rgb::OUTLINE.to_linear();
        for (a, b) in EDGES {
            self.line_vertices.push(LineVertex {
                position: corner(a).to_array(),
                color,
            });
            self.line_vertices.push(LineVertex {
                position: corner(b).to_array(),
                color,
            });
        }
    }

    /// Box draw order for a camera at `eye` looking along `forward`:
    /// farthest first.
    pub fn back_to_front(&self, eye: Vec3, forward: Vec3) -> Vec<&BlockRange> {
        let mut ranges: Vec<&BlockRange> = self.block_ranges.iter().collect();
        ranges.sort_by(|a, b| {
            let da = (a.center - eye).dot(forward);
            let db = (b.center - eye).dot(forward);
            db.total_cmp(&da)
        });
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerstack_core::{layout_network, ColorMap, Layer, VisualParams};

    fn two_block_layout() -> NetworkLayout {
        let layers = vec![
            Layer::new("Input", 8, 8, 3),
            Layer::new("Conv", 4, 4, 16).with_color(Rgb(0xFF0000)),
        ];
        layout_network(&layers, &ColorMap::default(), &VisualParams::default())
    }

    #[test]
    fn every_block_gets_a_full_box() {
        let layout = two_block_layout();
        let geometry = SceneGeometry::from_layout(&layout);
        assert_eq!(geometry.block_vertices.len(), 48);
        assert_eq!(geometry.block_indices.len(), 72);
        assert_eq!(geometry.block_ranges[0].indices, 0..36);
        assert_eq!(geometry.block_ranges[1].indices, 36..72);
        assert!(geometry
            .block_indices
            .iter()
            .all(|&i| (i as usize) < geometry.block_vertices.len()));
    }

    #[test]
    fn vertices_lie_on_block_bounds() {
        let layout = two_block_layout();
        let geometry = SceneGeometry::from_layout(&layout);
        let block = &layout.blocks[1];
        for vertex in &geometry.block_vertices[24..48] {
            let p = Vec3::from_array(vertex.position);
            assert!(p.cmpge(block.min() - 1e-5).all() && p.cmple(block.max() + 1e-5).all());
            let n = Vec3::from_array(vertex.normal);
            // A face vertex sits on the plane its normal points out of.
            let on_face = (p - block.center).dot(n) - (block.size * 0.5).dot(n.abs());
            assert!(on_face.abs() < 1e-5);
        }
    }

    #[test]
    fn triangles_wind_outward() {
        let layout = two_block_layout();
        let geometry = SceneGeometry::from_layout(&layout);
        for tri in geometry.block_indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(geometry.block_vertices[i as usize].position));
            let normal = Vec3::from_array(geometry.block_vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn colors_are_linear_with_opacity() {
        let layout = two_block_layout();
        let geometry = SceneGeometry::from_layout(&layout);
        let color = geometry.block_vertices[24].color;
        let expected = [1.0, 0.0, 0.0, 0.85];
        assert!(color.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-6), "{color:?}");
    }

    #[test]
    fn lines_cover_outlines_and_layout_lines() {
        let layout = two_block_layout();
        let geometry = SceneGeometry::from_layout(&layout);
        // 2 outlines + (2 callouts per block + 1 connector) segments.
        assert_eq!(
            geometry.line_vertices.len(),
            2 * OUTLINE_VERTICES_PER_BLOCK + layout.lines.len() * 2
        );
        assert_eq!(layout.lines.len(), 5);
        assert_eq!(geometry.line_vertices[0].color, [0.0, 0.0, 0.0]);
        let callout = Rgb::CALLOUT.to_linear();
        assert_eq!(
            geometry.line_vertices[2 * OUTLINE_VERTICES_PER_BLOCK].color,
            callout
        );
    }

    #[test]
    fn far_blocks_draw_first() {
        let layout = two_block_layout();
        let geometry = SceneGeometry::from_layout(&layout);
        let eye = Vec3::new(40.0, 40.0, 40.0);
        let forward = (Vec3::ZERO - eye).normalize();
        let order: Vec<_> = geometry
            .back_to_front(eye, forward)
            .iter()
            .map(|range| range.block)
            .collect();
        assert_eq!(order, [0, 1]);

        let eye = Vec3::new(40.0, 40.0, -40.0);
        let forward = (Vec3::ZERO - eye).normalize();
        let order: Vec<_> = geometry
            .back_to_front(eye, forward)
            .iter()
            .map(|range| range.block)
            .collect();
        assert_eq!(order, [1, 0]);
    }

    #[test]
    fn empty_layout_builds_nothing() {
        let geometry = SceneGeometry::from_layout(&NetworkLayout::default());
        assert!(geometry.block_vertices.is_empty());
        assert!(geometry.line_vertices.is_empty());
        assert!(geometry.back_to_front(Vec3::ONE, Vec3::NEG_ONE).is_empty());
    }
}
