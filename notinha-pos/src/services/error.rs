//! Checkout service errors

use notinha_printer::PrintError;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum PosError {
    /// Request rejected before anything was changed
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Printer not connected")]
    PrinterNotConnected,

    #[error("Print error: {0}")]
    Print(#[from] PrintError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A blocking or background task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PosError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type PosResult<T> = Result<T, PosError>;
