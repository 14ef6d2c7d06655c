//! Integration tests for the back-office client.
//!
//! Every scenario runs the real [`AppState`] against an `httpmock` server
//! standing in for the backend, so no external service is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p backoffice-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `draft_submission` - Cart submission, failures and the in-flight guard
//! - `products_api` - Catalog reads and mutations
//! - `online_transactions_api` - Listing, spreadsheet upload, error messages
//! - `query_cache` - Freshness window, retry and invalidation

use std::sync::Arc;
use std::time::Duration;

use backoffice_admin::storage::{ClientStore, MemoryStore};
use backoffice_admin::{AdminConfig, AppState};
use httpmock::MockServer;
use secrecy::SecretString;
use serde_json::{Value, json};

/// Session token used by the logged-in helpers.
pub const TOKEN: &str = "test-token";

/// `Authorization` header value matching [`TOKEN`].
pub const BEARER: &str = "Bearer test-token";

/// Configuration pointing at `server`.
///
/// # Panics
///
/// Panics if the mock server URL does not parse.
#[must_use]
pub fn config_for(server: &MockServer) -> AdminConfig {
    let api_url = server.base_url().parse().expect("mock server URL");
    AdminConfig {
        api_url,
        cache_ttl: Duration::from_secs(60),
        ..AdminConfig::default()
    }
}

/// State over `store`, talking to `server`, with nobody logged in.
///
/// # Panics
///
/// Panics if the state cannot be built.
#[must_use]
pub fn state_with_store(server: &MockServer, store: Arc<dyn ClientStore>) -> AppState {
    AppState::with_store(config_for(server), store).expect("state")
}

/// Fresh in-memory state talking to `server`, logged in with [`TOKEN`].
///
/// # Panics
///
/// Panics if the state cannot be built or the token cannot be stored.
#[must_use]
pub fn logged_in(server: &MockServer) -> AppState {
    let state = state_with_store(server, Arc::new(MemoryStore::new()));
    state
        .auth()
        .login(token())
        .expect("store token");
    state
}

/// [`TOKEN`] as a secret.
#[must_use]
pub fn token() -> SecretString {
    SecretString::from(TOKEN.to_string())
}

/// Backend JSON for a product.
#[must_use]
pub fn product_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "cost_price": 1000,
        "shopee_sale_price": 1500,
        "shopee_category": "A",
        "gross_profit_percentage": 20.0,
        "shopee_name": format!("{name} Shopee"),
    })
}

/// Backend JSON for an online transaction.
#[must_use]
pub fn transaction_json(id: &str, order_number: &str) -> Value {
    json!({
        "id": id,
        "type": "SHOPEE",
        "order_number": order_number,
        "created_date": "2024-03-05T10:00:00Z",
        "period_month": 3,
        "period_year": 2024,
        "total_base_amount": 10000,
        "total_sale_amount": 15000,
        "total_net_profit": 4000,
        "total_fee_amount": 1000,
        "created_by": "admin",
    })
}

/// A list response envelope.
#[must_use]
pub fn page_json(data: Vec<Value>, page_number: u32, page_size: u32) -> Value {
    json!({
        "data": data,
        "metadata": { "page_number": page_number, "page_size": page_size },
    })
}
