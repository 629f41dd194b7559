#![warn(missing_docs)]
//! Data model and layout for the layer stack diagram.

mod color;
mod draft;
mod error;
mod layer;
mod layout;
mod params;
mod state;

pub use color::{ColorMap, LegendEntry, Rgb};
pub use draft::{
    font_options, format_one_decimal, format_two_decimals, parse_dimension, EditDraft, LayerRow,
    TypeRow, NEW_LAYER_NAME, NEW_TYPE_NAME,
};
pub use error::NetworkError;
pub use layer::{default_layers, Layer};
pub use layout::{
    layout_network, visual_extent, Block, Label, LabelKind, LineKind, LineSegment, NetworkLayout,
};
pub use params::{FontChoice, VisualParams};
pub use state::NetworkState;
