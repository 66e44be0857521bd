//! Error types surfaced by the bill controllers.
//!
//! Validation failures are returned synchronously from the event handler that
//! detected them. Store failures keep the service's own message so the view
//! layer can match on it (for example `"Erreur 404"`).

use thiserror::Error;

/// Failure reported by the bill service or the transport in front of it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
    status: Option<u16>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the failed response, when there was one
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Failure of the bill listing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BillsError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Rejection of a receipt selection on the new bill form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewBillError {
    #[error("A file must be selected.")]
    MissingFile,
    #[error("Supported files: .png, .jpeg, .jpg")]
    UnsupportedFileType { file_name: String },
}

/// Raw bill value the display formatter could not interpret
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid bill date: {0:?}")]
    InvalidDate(String),
    #[error("Unknown bill status: {0:?}")]
    UnknownStatus(String),
}

/// Page the view bindings could not attach to
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("No document to attach to")]
    NoDocument,
    #[error("Invalid selector {0:?}")]
    Selector(String),
}
