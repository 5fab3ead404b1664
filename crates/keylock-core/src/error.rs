use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("Invalid key character: {0:?}")]
    InvalidKey(char),

    #[error("Digit must be 0-9, got {0}")]
    InvalidDigit(u8),

    // Credential errors
    #[error("Invalid credential: {message}")]
    InvalidCredential { message: String },

    // Channel errors
    #[error("Event channel closed: {0}")]
    ChannelClosed(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
