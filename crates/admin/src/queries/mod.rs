//! Cached data-fetch layer.
//!
//! Every read is keyed by a deterministic [`QueryKey`] and served from a
//! `moka` cache while fresh (5 minutes by default). A failed read is retried
//! once. Mutations go through here too, so they can invalidate the keys they
//! make stale.

mod cache;

pub use cache::*;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use backoffice_core::{
    CreateOnlineTransactionRequest, CreateProductRequest, OnlineTransaction,
    OnlineTransactionsQuery, Page, Product, ProductId, ProductsQuery, TransactionId,
    UpdateOnlineTransactionRequest, UpdateProductRequest,
};
use moka::future::Cache;
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::api::{ApiError, BackofficeClient, SpreadsheetUpload};
use crate::config::AdminConfig;
use crate::draft::{DraftError, DraftHolder};

const MAX_CAPACITY: u64 = 1000;

/// Query layer over a [`BackofficeClient`].
#[derive(Clone)]
pub struct Queries {
    client: BackofficeClient,
    cache: Cache<String, CacheValue>,
    /// Bumped on every invalidation. A read that started before the bump
    /// does not cache its result.
    epoch: Arc<AtomicU64>,
}

impl Queries {
    /// Create a query layer with the configured freshness window.
    #[must_use]
    pub fn new(client: BackofficeClient, config: &AdminConfig) -> Self {
        Self::with_ttl(client, config.cache_ttl)
    }

    /// Create a query layer with an explicit freshness window.
    #[must_use]
    pub fn with_ttl(client: BackofficeClient, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self {
            client,
            cache,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &BackofficeClient {
        &self.client
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// One page of products.
    ///
    /// # Errors
    ///
    /// Returns the error of the retried request if both attempts fail.
    #[instrument(skip(self, token))]
    pub async fn products(
        &self,
        query: &ProductsQuery,
        token: Option<&SecretString>,
    ) -> Result<Page<Product>, ApiError> {
        self.cached(QueryKey::products(query), || {
            self.client.list_products(query, token)
        })
        .await
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns the error of the retried request if both attempts fail.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn product(
        &self,
        id: &ProductId,
        token: Option<&SecretString>,
    ) -> Result<Product, ApiError> {
        self.cached(QueryKey::product(id), || self.client.get_product(id, token))
            .await
    }

    /// One page of online transactions.
    ///
    /// # Errors
    ///
    /// Returns the error of the retried request if both attempts fail.
    #[instrument(skip(self, token))]
    pub async fn online_transactions(
        &self,
        query: &OnlineTransactionsQuery,
        token: Option<&SecretString>,
    ) -> Result<Page<OnlineTransaction>, ApiError> {
        self.cached(QueryKey::online_transactions(query), || {
            self.client.list_online_transactions(query, token)
        })
        .await
    }

    /// One online transaction.
    ///
    /// # Errors
    ///
    /// Returns the error of the retried request if both attempts fail.
    #[instrument(skip(self, token), fields(transaction_id = %id))]
    pub async fn online_transaction(
        &self,
        id: &TransactionId,
        token: Option<&SecretString>,
    ) -> Result<OnlineTransaction, ApiError> {
        self.cached(QueryKey::online_transaction(id), || {
            self.client.get_online_transaction(id, token)
        })
        .await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a product and invalidate product lists.
    ///
    /// # Errors
    ///
    /// See [`BackofficeClient::create_product`].
    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let body = self.client.create_product(request, token).await?;
        self.invalidate_prefix(PRODUCTS).await;
        Ok(body)
    }

    /// Update a product and invalidate it and the product lists.
    ///
    /// # Errors
    ///
    /// See [`BackofficeClient::update_product`].
    pub async fn update_product(
        &self,
        id: &ProductId,
        request: &UpdateProductRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let body = self.client.update_product(id, request, token).await?;
        self.invalidate_product(id).await;
        Ok(body)
    }

    /// Delete a product and invalidate it and the product lists.
    ///
    /// # Errors
    ///
    /// See [`BackofficeClient::delete_product`].
    pub async fn delete_product(
        &self,
        id: &ProductId,
        token: Option<&SecretString>,
    ) -> Result<(), ApiError> {
        self.client.delete_product(id, token).await?;
        self.invalidate_product(id).await;
        Ok(())
    }

    /// Record an explicit-amount transaction and invalidate transaction lists.
    ///
    /// # Errors
    ///
    /// See [`BackofficeClient::create_online_transaction`].
    pub async fn create_online_transaction(
        &self,
        request: &CreateOnlineTransactionRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let body = self.client.create_online_transaction(request, token).await?;
        self.invalidate_prefix(ONLINE_TRANSACTIONS).await;
        Ok(body)
    }

    /// Update a transaction and invalidate it and the transaction lists.
    ///
    /// # Errors
    ///
    /// See [`BackofficeClient::update_online_transaction`].
    pub async fn update_online_transaction(
        &self,
        id: &TransactionId,
        request: &UpdateOnlineTransactionRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let body = self
            .client
            .update_online_transaction(id, request, token)
            .await?;
        self.invalidate_prefix(ONLINE_TRANSACTIONS).await;
        self.cache
            .invalidate(&QueryKey::online_transaction(id).to_string())
            .await;
        Ok(body)
    }

    /// Upload a spreadsheet and invalidate transaction lists.
    ///
    /// # Errors
    ///
    /// See [`BackofficeClient::upload_spreadsheet`].
    pub async fn upload_spreadsheet(
        &self,
        upload: SpreadsheetUpload,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let body = self.client.upload_spreadsheet(upload, token).await?;
        self.invalidate_prefix(ONLINE_TRANSACTIONS).await;
        Ok(body)
    }

    /// Submit the draft to `POST /online-transactions` and, on success,
    /// invalidate transaction lists.
    ///
    /// # Errors
    ///
    /// See [`DraftHolder::submit`].
    pub async fn submit_draft(
        &self,
        draft: &DraftHolder,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, DraftError> {
        let endpoint = self.client.endpoint("/online-transactions");
        let body = draft.submit(&endpoint, token).await?;
        self.invalidate_prefix(ONLINE_TRANSACTIONS).await;
        Ok(body)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every entry whose key lies under `prefix` (segment-wise).
    pub async fn invalidate_prefix(&self, prefix: &str) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let stale: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| has_prefix(key, prefix))
            .map(|(key, _)| String::clone(&key))
            .collect();

        debug!(prefix, count = stale.len(), "Invalidating cached queries");
        for key in stale {
            self.cache.invalidate(&key).await;
        }
    }

    /// Drop every cached entry.
    pub async fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// Whether `key` currently has a fresh cached value.
    #[must_use]
    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.cache.contains_key(&key.to_string())
    }

    async fn invalidate_product(&self, id: &ProductId) {
        self.invalidate_prefix(PRODUCTS).await;
        self.cache.invalidate(&QueryKey::product(id).to_string()).await;
    }

    /// Serve `key` from cache, else fetch (retrying once) and cache.
    async fn cached<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: Cacheable,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let key = key.to_string();

        if let Some(value) = self.cache.get(&key).await
            && let Some(hit) = T::from_cached(value)
        {
            debug!(%key, "Cache hit");
            return Ok(hit);
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        let value = match fetch().await {
            Ok(value) => value,
            Err(e) => {
                debug!(%key, error = %e, "Query failed, retrying once");
                fetch().await?
            }
        };

        if self.epoch.load(Ordering::Acquire) == epoch {
            self.cache.insert(key.clone(), value.clone().into_cached()).await;
            // An invalidation may have slipped in between the check and the insert
            if self.epoch.load(Ordering::Acquire) != epoch {
                self.cache.invalidate(&key).await;
            }
        } else {
            debug!(%key, "Invalidated while in flight, not caching");
        }
        Ok(value)
    }
}

impl std::fmt::Debug for Queries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queries")
            .field("client", &self.client)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
