//! Error types for the controller tasks.

use keylock_hardware::HardwareError;
use keylock_store::StorageError;
use thiserror::Error;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Errors that can stop a controller or scanner task.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A peripheral operation failed.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// Persisting or loading the credential snapshot failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The key event channel closed while a task still needed it.
    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),
}
