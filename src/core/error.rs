use thiserror::Error;

#[derive(Error, Debug)]
pub enum NemesisError {
    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("Unknown morph form: {0}")]
    UnknownMorphForm(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NemesisError>;
