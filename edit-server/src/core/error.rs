use shop_client::ClientError;
use thiserror::Error;

/// Errors that stop the server from starting or running
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shop client error: {0}")]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for server setup
pub type Result<T> = std::result::Result<T, ServerError>;
