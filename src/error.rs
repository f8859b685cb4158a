use thiserror::Error;

/// Errors from the surfaces around the converter: config files, HTML input, JSON output.
///
/// Matching itself never fails; a measurement that can't be recognized is just left alone.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
