use std::path::PathBuf;

/// Errors raised while fetching or decoding an image.
///
/// The slideshow never sees these: the loader logs them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsupported image format for '{0}'")]
    UnsupportedFormat(String),

    #[error("Failed to decode '{id}': {message}")]
    Decode { id: String, message: String },

    #[error("Failed to create texture for '{id}': {message}")]
    Texture { id: String, message: String },

    #[error("Failed to start fetch worker: {0}")]
    Worker(#[source] std::io::Error),
}

/// Errors raised while assembling the runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to list images: {0}")]
    Discovery(#[from] LoadError),

    #[error("No images to show")]
    NoImages,
}
