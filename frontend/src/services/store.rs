//! # Bill store contract
//!
//! The bill service is remote and opaque. Controllers only see this trait, so
//! the HTTP client in [`super::api`] and the in-memory store used by tests are
//! interchangeable.
//!
//! The browser runs everything on one thread, so futures are not `Send`.

use async_trait::async_trait;
use shared::{Bill, CreateBillResponse};
use web_sys::{Blob, File};

use crate::errors::StoreError;

/// Where the receipt's bytes live
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptContent {
    Bytes(Vec<u8>),
    /// Handed to the upload as is, never read into memory
    Blob(Blob),
}

/// A receipt picked by the employee
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFile {
    /// True file name, as reported by the browser's `File` object
    pub name: String,
    pub content_type: String,
    pub content: ReceiptContent,
}

impl ReceiptFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            content: ReceiptContent::Bytes(bytes),
        }
    }

    /// Wrap a file picked in a file input
    pub fn from_web_file(file: &File) -> Self {
        Self {
            name: file.name(),
            content_type: file.type_(),
            content: ReceiptContent::Blob(file.clone().into()),
        }
    }

    /// Lowercased extension of the file name, if it has one
    pub fn extension(&self) -> Option<String> {
        let (_, extension) = self.name.rsplit_once('.')?;
        Some(extension.to_ascii_lowercase())
    }
}

/// Multipart body of a receipt upload
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptUpload {
    pub file: ReceiptFile,
    /// Uploader's email, sent as the `email` form part
    pub email: String,
}

/// Header overrides for a store request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestHeaders {
    /// Leave `Content-Type` unset so the transport writes the multipart boundary
    pub no_content_type: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBillRequest {
    pub data: ReceiptUpload,
    pub headers: RequestHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBillRequest {
    /// JSON encoded bill metadata
    pub data: String,
    /// Key of the record to update; `None` when no upload has resolved yet
    pub selector: Option<String>,
}

/// The `bills` resource of the bill service
#[async_trait(?Send)]
pub trait BillStore {
    /// List every bill visible to the current user
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;

    /// Upload a receipt, allocating a new bill record
    async fn create(&self, request: CreateBillRequest) -> Result<CreateBillResponse, StoreError>;

    /// Attach metadata to an existing bill record
    async fn update(&self, request: UpdateBillRequest) -> Result<Bill, StoreError>;
}
