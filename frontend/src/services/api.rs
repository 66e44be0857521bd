use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use serde::Deserialize;
use shared::{Bill, CreateBillResponse};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use crate::errors::StoreError;
use crate::services::session::{local_storage_item, TOKEN_KEY};
use crate::services::store::{
    BillStore, CreateBillRequest, ReceiptContent, ReceiptUpload, RequestHeaders, UpdateBillRequest,
};

/// Error body returned by the bill service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// API client for the bill service
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:5678".to_string(),
            token: None,
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url, token: None }
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use the token saved by the login page, if any
    pub fn with_stored_token(self) -> Self {
        match local_storage_item(TOKEN_KEY) {
            Some(token) => self.with_token(token),
            None => self,
        }
    }

    fn bills_url(&self) -> String {
        format!("{}/bills", self.base_url)
    }

    fn with_headers(&self, builder: RequestBuilder, headers: RequestHeaders) -> RequestBuilder {
        let builder = if headers.no_content_type {
            builder
        } else {
            builder.header("Content-Type", "application/json")
        };
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Turn a non-2xx response into a `StoreError` carrying the service's message
    async fn error_from(response: Response) -> StoreError {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.message,
            Err(_) => text,
        };
        StoreError::with_status(status, message)
    }

    async fn parse<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, StoreError> {
        if !response.ok() {
            return Err(Self::error_from(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::new(format!("Failed to parse response: {}", e)))
    }

    fn form_data(upload: &ReceiptUpload) -> Result<FormData, JsValue> {
        let blob = match &upload.file.content {
            ReceiptContent::Blob(blob) => blob.clone(),
            ReceiptContent::Bytes(bytes) => {
                let bytes = js_sys::Uint8Array::from(bytes.as_slice());
                let parts = js_sys::Array::of1(&bytes);
                let options = BlobPropertyBag::new();
                options.set_type(&upload.file.content_type);
                Blob::new_with_u8_array_sequence_and_options(&parts, &options)?
            }
        };

        let form_data = FormData::new()?;
        form_data.append_with_blob_and_filename("file", &blob, &upload.file.name)?;
        form_data.append_with_str("email", &upload.email)?;
        Ok(form_data)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl BillStore for ApiClient {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let builder = self.with_headers(Request::get(&self.bills_url()), RequestHeaders::default());
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Network error: {}", e)))?;
        Self::parse(response).await
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreateBillResponse, StoreError> {
        let form_data = Self::form_data(&request.data)
            .map_err(|e| StoreError::new(format!("Failed to build upload form: {:?}", e)))?;
        let response = self
            .with_headers(Request::post(&self.bills_url()), request.headers)
            .body(form_data)
            .map_err(|e| StoreError::new(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Network error: {}", e)))?;
        Self::parse(response).await
    }

    async fn update(&self, request: UpdateBillRequest) -> Result<Bill, StoreError> {
        // An update without a prior upload addresses the "undefined" record,
        // exactly as the page always has.
        let selector = request.selector.as_deref().unwrap_or("undefined");
        let url = format!("{}/{}", self.bills_url(), selector);
        let response = self
            .with_headers(Request::patch(&url), RequestHeaders::default())
            .body(request.data)
            .map_err(|e| StoreError::new(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Network error: {}", e)))?;
        Self::parse(response).await
    }
}
