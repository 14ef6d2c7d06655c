//! Domain types for the back office.
//!
//! This module provides type-safe wrappers for the backend's records and the
//! client-side transaction draft.

pub mod channel;
pub mod draft;
pub mod id;
pub mod pagination;
pub mod price;
pub mod product;
pub mod transaction;

pub use channel::{SaleChannel, ShopeeCategory};
pub use draft::{DraftFields, DraftLine, LinePatch, TransactionDraft};
pub use id::*;
pub use pagination::{DEFAULT_PAGE_SIZE, DataEnvelope, Page, PageMetadata};
pub use price::Rupiah;
pub use product::{CreateProductRequest, Product, ProductInput, ProductsQuery, UpdateProductRequest};
pub use transaction::{
    CreateOnlineTransactionRequest, OnlineTransaction, OnlineTransactionProduct,
    OnlineTransactionsQuery, TransactionFilters, TransactionProductInput,
    UpdateOnlineTransactionRequest,
};
