use anyhow::Result;
use layerstack_camera::OrbitSettings;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/layerstack.toml";

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Network description loaded at startup instead of the built-in one.
    /// Relative paths are resolved against the config file's directory.
    pub network: Option<PathBuf>,
    pub window: WindowSection,
    pub camera: CameraSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraSection {
    pub damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "Network Visualizer".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl Default for CameraSection {
    fn default() -> Self {
        let orbit = OrbitSettings::default();
        Self {
            damping: orbit.damping,
            damping_factor: orbit.damping_factor,
            rotate_speed: orbit.rotate_speed,
            zoom_speed: orbit.zoom_speed,
        }
    }
}

impl CameraSection {
    /// Orbit settings with out-of-range values replaced by defaults.
    pub fn orbit_settings(&self) -> OrbitSettings {
        let defaults = OrbitSettings::default();
        let positive_or = |value: f32, default: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                default
            }
        };
        OrbitSettings {
            damping: self.damping,
            damping_factor: if self.damping_factor.is_finite()
                && self.damping_factor > 0.0
                && self.damping_factor <= 1.0
            {
                self.damping_factor
            } else {
                defaults.damping_factor
            },
            rotate_speed: positive_or(self.rotate_speed, defaults.rotate_speed),
            zoom_speed: positive_or(self.zoom_speed, defaults.zoom_speed),
        }
    }
}

impl ViewerConfig {
    /// Load viewer configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ViewerConfig>(&contents) {
                Ok(mut cfg) => {
                    cfg.network = cfg.network.map(|network| relative_to(path, network));
                    cfg
                }
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ViewerConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    tracing::debug!(
                        "Viewer config not found at {}. Using defaults",
                        path.display()
                    );
                }
                ViewerConfig::default()
            }
        }
    }

    /// Save viewer configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

fn relative_to(config_path: &Path, network: PathBuf) -> PathBuf {
    match config_path.parent() {
        Some(dir) if network.is_relative() && !dir.as_os_str().is_empty() => dir.join(network),
        _ => network,
    }
}
