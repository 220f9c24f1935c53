use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("backend is no longer reachable")]
    Disconnected,

    #[error("backend dropped the reply to '{0}'")]
    ReplyDropped(&'static str),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("backup failed: {0}")]
    Backup(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl<T> From<crossbeam_channel::SendError<T>> for BridgeError {
    fn from(_: crossbeam_channel::SendError<T>) -> Self {
        BridgeError::Disconnected
    }
}
