//! Cache keys and cached values of the query layer.

use std::fmt;

use backoffice_core::{
    OnlineTransaction, OnlineTransactionsQuery, Page, Product, ProductId, ProductsQuery,
    TransactionId,
};
use serde::Serialize;

/// Root segment of product list keys.
pub const PRODUCTS: &str = "products";
/// Root segment of single-product keys.
pub const PRODUCT: &str = "product";
/// Root segment of transaction list keys.
pub const ONLINE_TRANSACTIONS: &str = "onlineTransactions";
/// Root segment of single-transaction keys.
pub const ONLINE_TRANSACTION: &str = "onlineTransaction";

/// Deterministic key of one query.
///
/// Rendered as colon-separated segments, e.g.
/// `products:paginated:page_number=0&page_size=10` or `product:<id>`.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum QueryKey {
    ProductsPaginated(String),
    Product(ProductId),
    OnlineTransactionsPaginated(String),
    OnlineTransaction(TransactionId),
}

impl QueryKey {
    #[must_use]
    pub fn products(query: &ProductsQuery) -> Self {
        Self::ProductsPaginated(query_string(query))
    }

    #[must_use]
    pub fn product(id: &ProductId) -> Self {
        Self::Product(id.clone())
    }

    #[must_use]
    pub fn online_transactions(query: &OnlineTransactionsQuery) -> Self {
        Self::OnlineTransactionsPaginated(query_string(query))
    }

    #[must_use]
    pub fn online_transaction(id: &TransactionId) -> Self {
        Self::OnlineTransaction(id.clone())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductsPaginated(qs) => write!(f, "{PRODUCTS}:paginated:{qs}"),
            Self::Product(id) => write!(f, "{PRODUCT}:{id}"),
            Self::OnlineTransactionsPaginated(qs) => {
                write!(f, "{ONLINE_TRANSACTIONS}:paginated:{qs}")
            }
            Self::OnlineTransaction(id) => write!(f, "{ONLINE_TRANSACTION}:{id}"),
        }
    }
}

/// Whether `key` lies under `prefix`, compared segment by segment.
///
/// `products` matches `products:paginated:..` but not `product:p1`.
#[must_use]
pub fn has_prefix(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
}

/// URL-encoded parameters of `query`, sorted by name, unset ones omitted.
#[must_use]
pub fn query_string<Q: Serialize + ?Sized>(query: &Q) -> String {
    let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(query) else {
        return String::new();
    };

    let mut pairs: Vec<(String, String)> = fields
        .into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((name, s)),
            other => Some((name, other.to_string())),
        })
        .collect();
    pairs.sort();

    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Cached response bodies.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Page<Product>),
    Product(Box<Product>),
    OnlineTransactions(Page<OnlineTransaction>),
    OnlineTransaction(Box<OnlineTransaction>),
}

/// Conversion between a response type and its [`CacheValue`] variant.
pub trait Cacheable: Clone + Sized {
    fn into_cached(self) -> CacheValue;
    fn from_cached(value: CacheValue) -> Option<Self>;
}

impl Cacheable for Page<Product> {
    fn into_cached(self) -> CacheValue {
        CacheValue::Products(self)
    }

    fn from_cached(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Products(page) => Some(page),
            _ => None,
        }
    }
}

impl Cacheable for Product {
    fn into_cached(self) -> CacheValue {
        CacheValue::Product(Box::new(self))
    }

    fn from_cached(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Product(product) => Some(*product),
            _ => None,
        }
    }
}

impl Cacheable for Page<OnlineTransaction> {
    fn into_cached(self) -> CacheValue {
        CacheValue::OnlineTransactions(self)
    }

    fn from_cached(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::OnlineTransactions(page) => Some(page),
            _ => None,
        }
    }
}

impl Cacheable for OnlineTransaction {
    fn into_cached(self) -> CacheValue {
        CacheValue::OnlineTransaction(Box::new(self))
    }

    fn from_cached(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::OnlineTransaction(transaction) => Some(*transaction),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use backoffice_core::{SaleChannel, TransactionFilters};

    use super::*;

    #[test]
    fn test_product_keys() {
        let key = QueryKey::products(&ProductsQuery::default());
        assert_eq!(key.to_string(), "products:paginated:page_number=0&page_size=10");

        let key = QueryKey::products(&ProductsQuery::default().with_name(Some("gelas plastik".into())));
        assert_eq!(
            key.to_string(),
            "products:paginated:name=gelas+plastik&page_number=0&page_size=10"
        );

        assert_eq!(QueryKey::product(&ProductId::new("p1")).to_string(), "product:p1");
    }

    #[test]
    fn test_transaction_keys() {
        let query = OnlineTransactionsQuery::default().with_filters(TransactionFilters {
            channel: Some(SaleChannel::Tiktok),
            period_month: Some(3),
            ..TransactionFilters::default()
        });
        assert_eq!(
            QueryKey::online_transactions(&query).to_string(),
            "onlineTransactions:paginated:page_number=0&page_size=10&period_month=3&type=TIKTOK"
        );
        assert_eq!(
            QueryKey::online_transaction(&TransactionId::new("t1")).to_string(),
            "onlineTransaction:t1"
        );
    }

    #[test]
    fn test_keys_are_deterministic() {
        let a = QueryKey::products(&ProductsQuery::default().with_page(3));
        let b = QueryKey::products(&ProductsQuery::default().with_page(3));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
        assert_ne!(a, QueryKey::products(&ProductsQuery::default()));
    }

    #[test]
    fn test_has_prefix_is_segment_aware() {
        assert!(has_prefix("products:paginated:page_number=0", PRODUCTS));
        assert!(has_prefix("products", PRODUCTS));
        assert!(!has_prefix("product:p1", PRODUCTS));
        assert!(has_prefix("product:p1", PRODUCT));
        assert!(!has_prefix("products:paginated:", PRODUCT));
        assert!(!has_prefix("onlineTransaction:t1", ONLINE_TRANSACTIONS));
        assert!(has_prefix("onlineTransactions:paginated:", ONLINE_TRANSACTIONS));
    }
}
