//! Online transaction operations, including the spreadsheet auto-input.

use std::path::Path;

use backoffice_core::{
    CreateOnlineTransactionRequest, DataEnvelope, OnlineTransaction, OnlineTransactionsQuery, Page,
    TransactionId, UpdateOnlineTransactionRequest,
};
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiError, BackofficeClient, require_token};

/// MIME type of `.xlsx` workbooks.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// MIME type of legacy `.xls` workbooks.
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// A validated spreadsheet ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SpreadsheetUpload {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl SpreadsheetUpload {
    /// Read a workbook from disk. The type is taken from the extension and
    /// checked before the file is opened.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnsupportedFileType` for anything but `.xlsx` or
    /// `.xls`, or `ApiError::Io` if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = path
            .extension()
            .and_then(|ext| mime_for_extension(&ext.to_string_lossy()))
            .ok_or_else(|| ApiError::UnsupportedFileType(file_name.clone()))?;

        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Wrap in-memory contents with a declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnsupportedFileType` unless `mime` is one of
    /// [`XLSX_MIME`] or [`XLS_MIME`].
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, ApiError> {
        let file_name = file_name.into();
        let mime = [XLSX_MIME, XLS_MIME]
            .into_iter()
            .find(|accepted| accepted.eq_ignore_ascii_case(mime.trim()))
            .ok_or_else(|| ApiError::UnsupportedFileType(file_name.clone()))?;
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub const fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SpreadsheetUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadsheetUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "xlsx" => Some(XLSX_MIME),
        "xls" => Some(XLS_MIME),
        _ => None,
    }
}

impl BackofficeClient {
    /// Fetch one page of online transactions, with its pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_online_transactions(
        &self,
        query: &OnlineTransactionsQuery,
        token: Option<&SecretString>,
    ) -> Result<Page<OnlineTransaction>, ApiError> {
        self.get_with_query("/online-transactions", query, token)
            .await
    }

    /// Fetch a single online transaction with its product rows.
    ///
    /// # Errors
    ///
    /// Returns error if the transaction is not found or the API request fails.
    #[instrument(skip(self, token), fields(transaction_id = %id))]
    pub async fn get_online_transaction(
        &self,
        id: &TransactionId,
        token: Option<&SecretString>,
    ) -> Result<OnlineTransaction, ApiError> {
        let path = format!("/online-transactions/{id}");
        let response: DataEnvelope<OnlineTransaction> = self.get(&path, token).await?;
        Ok(response.data)
    }

    /// Record a transaction with explicit per-row amounts.
    ///
    /// The cart flow goes through [`crate::draft::DraftHolder::submit`]
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` without a token, or the backend
    /// message (fallback `"Failed to create transaction"`).
    #[instrument(skip(self, request, token), fields(order_number = %request.order_number))]
    pub async fn create_online_transaction(
        &self,
        request: &CreateOnlineTransactionRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let token = require_token(token)?;
        self.post(
            "/online-transactions",
            request,
            Some(token),
            "Failed to create transaction",
        )
        .await
    }

    /// Update a recorded transaction. Unset fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` without a token, or the backend
    /// message (fallback `"Failed to update transaction"`).
    #[instrument(skip(self, request, token), fields(transaction_id = %id))]
    pub async fn update_online_transaction(
        &self,
        id: &TransactionId,
        request: &UpdateOnlineTransactionRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let token = require_token(token)?;
        let path = format!("/online-transactions/{id}");
        self.put(&path, request, Some(token), "Failed to update transaction")
            .await
    }

    /// Upload a marketplace export; the backend creates the transactions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` without a token, or the backend
    /// message (fallback `"Failed to upload file"`).
    #[instrument(skip(self, upload, token), fields(file = %upload.file_name, bytes = upload.len()))]
    pub async fn upload_spreadsheet(
        &self,
        upload: SpreadsheetUpload,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let token = require_token(token)?;
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.mime)?;
        let form = Form::new().part("file", part);

        let body = self
            .post_multipart(
                "/online-transactions/auto-input-excel",
                form,
                Some(token),
                "Failed to upload file",
            )
            .await?;
        tracing::info!("Spreadsheet uploaded");
        Ok(body)
    }
}
