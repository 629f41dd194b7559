//! Layer records and the built-in example network.

use serde::{Deserialize, Serialize};

use crate::color::{ColorMap, Rgb};

/// One stage of the visualized network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Display name, also matched against legend keys.
    pub name: String,
    /// Spatial height.
    #[serde(rename = "H", alias = "h")]
    pub h: u32,
    /// Spatial width.
    #[serde(rename = "W", alias = "w")]
    pub w: u32,
    /// Channel count.
    #[serde(rename = "C", alias = "c")]
    pub c: u32,
    /// Explicit color overriding the legend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl Layer {
    /// Layer without an explicit color.
    pub fn new(name: impl Into<String>, h: u32, w: u32, c: u32) -> Self {
        Self {
            name: name.into(),
            h,
            w,
            c,
            color: None,
        }
    }

    /// Builder-style explicit color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// `HxWxC` text shown under the block.
    pub fn dimension_label(&self) -> String {
        format!("{}x{}x{}", self.h, self.w, self.c)
    }

    /// Explicit color, else the legend color for the name.
    pub fn resolve_color(&self, legend: &ColorMap) -> Rgb {
        self.color.unwrap_or_else(|| legend.color_for_name(&self.name))
    }
}

/// The spiking CNN shown on startup when no network file is given.
pub fn default_layers() -> Vec<Layer> {
    vec![
        Layer::new("Input (x)", 180, 320, 2),
        Layer::new("Initial Max Pool", 45, 80, 1),
        Layer::new("self.conv1", 42, 77, 8),
        Layer::new("Post-Conv1 Max Pool", 21, 38, 8),
        Layer::new("self.lif1", 21, 38, 8),
        Layer::new("self.conv2", 18, 35, 16),
        Layer::new("Post-Conv2 Max Pool", 9, 17, 16),
        Layer::new("self.lif2", 9, 17, 16),
        Layer::new("Flatten", 1, 1, 2448),
        Layer::new("self.fc1", 1, 1, 1),
        Layer::new("self.lif3", 1, 1, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_label_is_h_by_w_by_c() {
        assert_eq!(Layer::new("Input", 180, 320, 2).dimension_label(), "180x320x2");
    }

    #[test]
    fn explicit_color_beats_legend() {
        let legend = ColorMap::default();
        let layer = Layer::new("self.conv1", 1, 1, 1);
        assert_eq!(layer.resolve_color(&legend), Rgb(0xF4B400));
        let layer = layer.with_color(Rgb(0x000000));
        assert_eq!(layer.resolve_color(&legend), Rgb(0x000000));
    }

    #[test]
    fn default_network_matches_reference() {
        let layers = default_layers();
        assert_eq!(layers.len(), 11);
        assert_eq!(layers[8].name, "Flatten");
        assert_eq!(layers[8].c, 2448);
        assert!(layers.iter().all(|layer| layer.color.is_none()));
    }
}
