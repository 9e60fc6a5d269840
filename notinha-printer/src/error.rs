//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Device could not be opened
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer reports an error, offline or unavailable state
    #[error("Printer offline: {0}")]
    Offline(String),

    /// Write attempted on a closed printer
    #[error("Printer not connected")]
    NotConnected,

    /// Invalid printer address
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Windows spooler error
    #[cfg(windows)]
    #[error("Windows printer error: {0}")]
    WindowsPrinter(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
