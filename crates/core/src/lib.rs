//! Back-office core - shared types library.
//!
//! This crate provides the types used across the back-office components:
//! - `admin` - Client library for the back-office backend API
//! - `cli` - Operator command line (`backoffice`)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, sale channels, catalog and transaction records,
//!   pagination envelopes
//! - [`format`] - Rupiah and date formatting for display

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod types;

pub use types::*;
