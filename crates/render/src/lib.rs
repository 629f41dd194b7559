#![warn(missing_docs)]
//! wgpu renderer for the layer stack: translucent boxes and lines.

mod context;
mod geometry;
mod pipeline;
mod scene;

pub use context::{DepthTarget, RenderContext, DEPTH_FORMAT};
pub use geometry::{
    BlockRange, BlockVertex, LineVertex, SceneGeometry, INDICES_PER_BLOCK,
    OUTLINE_VERTICES_PER_BLOCK,
};
pub use pipeline::{
    BlockPipeline, LinePipeline, SceneBindings, SceneUniform, AMBIENT_COLOR, AMBIENT_INTENSITY,
    SUN_COLOR, SUN_INTENSITY, SUN_POSITION,
};
pub use scene::SceneRenderer;
