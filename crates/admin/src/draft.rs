//! Transaction draft holder.
//!
//! Owns the single pending [`TransactionDraft`] of the session. Every
//! mutation is written through to the client store under [`DRAFT_KEY`];
//! the pristine draft is never written. Submission posts the whole draft and
//! clears it on success.
//!
//! The holder is meant to be constructed once and shared behind an `Arc`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use backoffice_core::{DraftFields, DraftLine, LinePatch, TransactionDraft};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::ErrorBody;
use crate::storage::{ClientStore, DRAFT_KEY};

const SUBMIT_FALLBACK: &str = "Failed to submit transaction";

/// Errors raised by [`DraftHolder`].
#[derive(Debug, Error)]
pub enum DraftError {
    /// Line index outside the draft.
    #[error("Line index {index} is out of range (draft has {len} lines)")]
    InvalidArgument { index: usize, len: usize },

    /// `submit` was called while another submission is pending.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// No session token was supplied.
    #[error("Authentication token is missing")]
    MissingToken,

    /// Request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the draft.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Holder of the session's transaction draft.
pub struct DraftHolder {
    store: Arc<dyn ClientStore>,
    http: reqwest::Client,
    draft: Mutex<TransactionDraft>,
    last_error: Mutex<Option<String>>,
    submitting: AtomicBool,
}

impl DraftHolder {
    /// Rehydrate the draft from the store.
    ///
    /// A snapshot that does not parse is logged and deleted, and the holder
    /// starts empty. A store that cannot be read also yields an empty draft.
    pub fn load(store: Arc<dyn ClientStore>, http: reqwest::Client) -> Self {
        let draft = match store.get(DRAFT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<TransactionDraft>(&raw) {
                Ok(draft) => {
                    debug!(lines = draft.lines.len(), "Restored transaction draft");
                    draft
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable transaction draft");
                    if let Err(e) = store.remove(DRAFT_KEY) {
                        warn!(error = %e, "Failed to delete unreadable transaction draft");
                    }
                    TransactionDraft::default()
                }
            },
            Ok(None) => TransactionDraft::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored transaction draft");
                TransactionDraft::default()
            }
        };

        Self {
            store,
            http,
            draft: Mutex::new(draft),
            last_error: Mutex::new(None),
            submitting: AtomicBool::new(false),
        }
    }

    /// Copy of the current draft.
    #[must_use]
    pub fn snapshot(&self) -> TransactionDraft {
        self.lock_draft().clone()
    }

    /// Merge scalar fields. Last write wins per field.
    pub fn update_fields(&self, fields: DraftFields) {
        let mut draft = self.lock_draft();
        draft.update_fields(fields);
        self.persist(&draft);
    }

    /// Append a line. Lines for the same product are kept separate.
    pub fn add_line(&self, line: DraftLine) {
        let mut draft = self.lock_draft();
        draft.add_line(line);
        self.persist(&draft);
    }

    /// Merge `patch` into the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::InvalidArgument` if `index` is out of range; the
    /// draft is left untouched.
    pub fn update_line(&self, index: usize, patch: LinePatch) -> Result<(), DraftError> {
        self.try_mutate(|draft| {
            let len = draft.lines.len();
            if draft.update_line(index, patch) {
                Ok(())
            } else {
                Err(DraftError::InvalidArgument { index, len })
            }
        })
    }

    /// Remove the line at `index`; later lines shift down by one.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::InvalidArgument` if `index` is out of range; the
    /// draft is left untouched.
    pub fn remove_line(&self, index: usize) -> Result<DraftLine, DraftError> {
        self.try_mutate(|draft| {
            let len = draft.lines.len();
            draft
                .remove_line(index)
                .ok_or(DraftError::InvalidArgument { index, len })
        })
    }

    /// Replace the draft with the empty one and delete the stored copy.
    pub fn reset(&self) {
        let mut draft = self.lock_draft();
        *draft = TransactionDraft::default();
        if let Err(e) = self.store.remove(DRAFT_KEY) {
            warn!(error = %e, "Failed to delete stored transaction draft");
        }
        debug!("Transaction draft reset");
    }

    /// Whether a submission is pending.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Message of the last failed submission, cleared when a new one starts.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock_last_error().clone()
    }

    /// POST the whole draft as JSON to `endpoint`.
    ///
    /// On success the draft is reset and the parsed response body returned
    /// (`null` when empty). On failure the draft is kept and the message is
    /// recorded in [`last_error`](Self::last_error).
    ///
    /// # Errors
    ///
    /// - `DraftError::SubmissionInProgress` if another submission is pending
    /// - `DraftError::MissingToken` if `token` is absent or blank
    /// - `DraftError::Rejected` with the backend message (fallback
    ///   `"Failed to submit transaction"`) on a non-success status
    /// - `DraftError::Http` / `DraftError::Parse` on transport or decode
    ///   failures
    #[instrument(skip(self, token))]
    pub async fn submit(
        &self,
        endpoint: &str,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, DraftError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        *self.lock_last_error() = None;

        let result = self.send(endpoint, token).await;
        match &result {
            Ok(_) => {
                self.reset();
                info!("Transaction draft submitted");
            }
            Err(e) => {
                warn!(error = %e, "Transaction draft submission failed");
                *self.lock_last_error() = Some(e.to_string());
            }
        }
        result
    }

    async fn send(
        &self,
        endpoint: &str,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, DraftError> {
        let token = token
            .filter(|t| !t.expose_secret().trim().is_empty())
            .ok_or(DraftError::MissingToken)?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| DraftError::Parse(format!("Invalid token format: {e}")))?;
        auth.set_sensitive(true);

        let body = self.snapshot();
        let response = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = ErrorBody::from_bytes(&bytes).into_message(|| SUBMIT_FALLBACK.to_string());
            return Err(DraftError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| DraftError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Apply `f` under the lock and persist only if it succeeds.
    fn try_mutate<R>(
        &self,
        f: impl FnOnce(&mut TransactionDraft) -> Result<R, DraftError>,
    ) -> Result<R, DraftError> {
        let mut draft = self.lock_draft();
        let out = f(&mut draft)?;
        self.persist(&draft);
        Ok(out)
    }

    /// Write-through to the store. Failures are logged, not returned.
    fn persist(&self, draft: &TransactionDraft) {
        let written = serde_json::to_string(draft)
            .map_err(crate::storage::StorageError::from)
            .and_then(|json| self.store.set(DRAFT_KEY, &json));
        if let Err(e) = written {
            warn!(error = %e, "Failed to persist transaction draft");
        }
    }

    fn lock_draft(&self) -> MutexGuard<'_, TransactionDraft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_last_error(&self) -> MutexGuard<'_, Option<String>> {
        self.last_error.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for DraftHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftHolder")
            .field("draft", &*self.lock_draft())
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

/// Holds the in-flight flag; clears it on drop, including when the
/// submitting future is dropped mid-request.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, DraftError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DraftError::SubmissionInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
