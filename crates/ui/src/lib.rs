#![warn(missing_docs)]
//! egui overlays: floating labels, legend and the network edit panel.

mod fonts;
mod overlay;
mod panel;

pub use fonts::{candidate_paths, FontRegistry};
pub use overlay::{label_rect, paint_labels, show_edit_button, show_legend, to_color32};
pub use panel::{EditPanel, PanelEvents};
