use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid backend url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported backend url scheme `{0}`, expected ws or wss")]
    UnsupportedScheme(String),

    #[error("malformed viewer config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid reconnect policy: {0}")]
    Policy(String),

    #[error("failed to open websocket: {0}")]
    Connect(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
