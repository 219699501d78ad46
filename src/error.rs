use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid item kind: {0}")]
    InvalidItemKind(String),

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("No item form is open")]
    NoOpenForm,

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BoardError {
    /// True when the request never produced a usable response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::SerializationError(_))
    }

    /// True when the server answered with a non-success status
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

impl From<toml::de::Error> for BoardError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}
