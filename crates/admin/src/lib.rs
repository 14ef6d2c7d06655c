//! Back-office client library.
//!
//! Everything an operator surface needs to manage the product catalog and
//! the online-transaction ledger of the back-office backend:
//!
//! - [`api`]: HTTP calls to the backend
//! - [`queries`]: cached reads and invalidating mutations
//! - [`auth`]: the stored session token
//! - [`draft`]: the transaction draft ("cart") and its submission
//! - [`storage`]: durable client storage behind both holders
//! - [`state`]: composition of the above
//!
//! # Security
//!
//! The session token grants write access to the catalog. It is kept as a
//! `SecretString`, redacted from `Debug` output and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod draft;
pub mod error;
pub mod queries;
pub mod state;
pub mod storage;

pub use config::AdminConfig;
pub use error::AppError;
pub use state::AppState;
