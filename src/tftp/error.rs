//! Error types shared by the packet codec.
//!
//! [`TftpError`] is the closed set of conditions that have a wire code of
//! their own. [`Error`] is what encoding returns and what host programs raise;
//! anything that is not a [`TftpError`] travels as code 0.

use std::io;

use thiserror::Error;

use crate::tftp::shared::err_packet::ErrorCode;

/// Result type alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error conditions with a dedicated TFTP error code (1 through 7).
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum TftpError {
    #[error("Error File Not Found - {file}")]
    FileNotFound { file: String },

    #[error("Error Access Violation")]
    AccessViolation,

    #[error("Error Disk Full")]
    DiskFull,

    /// Single space after the dash, e.g. `Error Illegal Operation - Blank Mode`.
    #[error("Error Illegal Operation - {message}")]
    IllegalOperation { message: String },

    #[error("Error Unknown Transfer ID - {transfer_id}")]
    UnknownTransferId { transfer_id: String },

    #[error("Error File Exists: {file}")]
    FileExists { file: String },

    #[error("Error No Such User: {user}")]
    NoSuchUser { user: String },
}

impl TftpError {
    pub fn illegal_operation(message: impl Into<String>) -> Self {
        TftpError::IllegalOperation {
            message: message.into(),
        }
    }

    /// Wire code this kind is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            TftpError::FileNotFound { .. } => ErrorCode::FileNotFound,
            TftpError::AccessViolation => ErrorCode::AccessViolation,
            TftpError::DiskFull => ErrorCode::DiskFull,
            TftpError::IllegalOperation { .. } => ErrorCode::IllegalOperation,
            TftpError::UnknownTransferId { .. } => ErrorCode::UnknownTransferId,
            TftpError::FileExists { .. } => ErrorCode::FileExists,
            TftpError::NoSuchUser { .. } => ErrorCode::NoSuchUser,
        }
    }

    pub fn is_illegal_operation(&self) -> bool {
        matches!(self, TftpError::IllegalOperation { .. })
    }
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Protocol errors with their own wire code
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Tftp(#[from] TftpError),

    // -------------------------------------------------------------------------
    // Encode failures
    // -------------------------------------------------------------------------
    #[error("Invalid Error Code {0}, must be between 0 and 7")]
    InvalidErrorCode(u16),

    #[error("Invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Length of {field} did not match that written to buffer")]
    ShortWrite { field: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Anything the host program raises
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an arbitrary error so it can be reported to a peer as code 0.
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Other(err.into())
    }

    /// The classified kind, if this error has one.
    pub fn kind(&self) -> Option<&TftpError> {
        match self {
            Error::Tftp(kind) => Some(kind),
            _ => None,
        }
    }
}
