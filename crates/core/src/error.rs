//! Error type for network descriptions.

use thiserror::Error;

/// Failures while reading a network description.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A color string was not `#rrggbb`.
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    /// The document was not valid TOML or had the wrong shape.
    #[error("failed to parse network description: {0}")]
    Parse(#[from] toml::de::Error),
    /// The document could not be rendered back to TOML.
    #[error("failed to serialize network description: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Reading or writing the file failed.
    #[error("network file {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
