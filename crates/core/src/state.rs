//! The live network: layers, legend and visual parameters.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::color::{ColorMap, LegendEntry};
use crate::error::NetworkError;
use crate::layer::{default_layers, Layer};
use crate::layout::{layout_network, NetworkLayout};
use crate::params::VisualParams;

/// Everything the scene is rebuilt from.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkState {
    /// Layers in stack order.
    pub layers: Vec<Layer>,
    /// Type-to-color legend.
    pub legend: ColorMap,
    /// Global spacing and appearance.
    pub params: VisualParams,
}

impl Default for NetworkState {
    fn default() -> Self {
        Self {
            layers: default_layers(),
            legend: ColorMap::default(),
            params: VisualParams::default(),
        }
    }
}

impl NetworkState {
    /// Lay out the current layers.
    pub fn layout(&self) -> NetworkLayout {
        layout_network(&self.layers, &self.legend, &self.params)
    }

    /// Load a network description, filling missing sections with defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, NetworkError> {
        let contents = fs::read_to_string(path).map_err(|source| NetworkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse a TOML network description.
    pub fn from_toml_str(contents: &str) -> Result<Self, NetworkError> {
        let file: NetworkFile = toml::from_str(contents)?;
        Ok(file.into_state())
    }

    /// Render the state as a TOML network description.
    pub fn to_toml_string(&self) -> Result<String, NetworkError> {
        let file = NetworkFile {
            layers: Some(self.layers.clone()),
            legend: Some(self.legend.iter().cloned().collect()),
            visual: Some(self.params.clone()),
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

/// On-disk shape of a network description. Every section is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
struct NetworkFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visual: Option<VisualParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layers: Option<Vec<Layer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    legend: Option<Vec<LegendEntry>>,
}

impl NetworkFile {
    fn into_state(self) -> NetworkState {
        let defaults = NetworkState::default();
        NetworkState {
            layers: self.layers.unwrap_or(defaults.layers),
            legend: self
                .legend
                .map(|entries| {
                    entries
                        .into_iter()
                        .map(|entry| (entry.name, entry.color))
                        .collect()
                })
                .unwrap_or(defaults.legend),
            params: self.visual.unwrap_or(defaults.params),
        }
    }
}
