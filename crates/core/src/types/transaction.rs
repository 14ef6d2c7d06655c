//! Online transactions: orders placed on external marketplaces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::channel::SaleChannel;
use super::id::{ProductId, TransactionId, TransactionProductId};
use super::pagination::DEFAULT_PAGE_SIZE;
use super::price::Rupiah;

/// A recorded online transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineTransaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub channel: SaleChannel,
    pub order_number: String,
    /// ISO date or timestamp, kept verbatim for display.
    pub created_date: String,
    pub period_month: u32,
    pub period_year: i32,
    pub total_base_amount: Rupiah,
    pub total_sale_amount: Rupiah,
    pub total_net_profit: Rupiah,
    pub total_fee_amount: Rupiah,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<OnlineTransactionProduct>>,
}

impl OnlineTransaction {
    /// Total number of units across all product rows.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.products
            .iter()
            .flatten()
            .map(|p| u64::from(p.quantity))
            .sum()
    }
}

/// One product row of a recorded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineTransactionProduct {
    pub id: TransactionProductId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub cost_price: Rupiah,
    pub sale_price: Rupiah,
    pub fee_amount: Rupiah,
}

/// Product row with explicit amounts, for create/update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProductInput {
    /// Only set when updating an existing row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TransactionProductId>,
    pub product_id: ProductId,
    pub quantity: u32,
    pub base_amount: Rupiah,
    pub sale_amount: Rupiah,
    pub fee_amount: Rupiah,
}

/// Body of an explicit-amount `POST /online-transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOnlineTransactionRequest {
    #[serde(rename = "type")]
    pub channel: SaleChannel,
    pub order_number: String,
    pub period_month: u32,
    pub period_year: i32,
    pub products: Vec<TransactionProductInput>,
}

/// Body of `PUT /online-transactions/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOnlineTransactionRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel: Option<SaleChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<TransactionProductInput>>,
}

/// Query parameters of `GET /online-transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OnlineTransactionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel: Option<SaleChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for OnlineTransactionsQuery {
    fn default() -> Self {
        Self {
            page_number: Some(0),
            page_size: Some(DEFAULT_PAGE_SIZE),
            channel: None,
            order_number: None,
            period_month: None,
            period_year: None,
            created_by: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Filters of the transaction listing. Setting them returns to page 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilters {
    pub channel: Option<SaleChannel>,
    pub order_number: Option<String>,
    pub period_month: Option<u32>,
    pub period_year: Option<i32>,
}

impl OnlineTransactionsQuery {
    /// Replace the filters, keeping the page size.
    #[must_use]
    pub fn with_filters(mut self, filters: TransactionFilters) -> Self {
        self.channel = filters.channel;
        self.order_number = filters.order_number.filter(|n| !n.trim().is_empty());
        self.period_month = filters.period_month;
        self.period_year = filters.period_year;
        self.page_number = Some(0);
        self
    }

    /// Change the page size. Returns to the first page.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self.page_number = Some(0);
        self
    }

    /// Move to another page, keeping the filters.
    #[must_use]
    pub const fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_parses_backend_payload() {
        let json = r#"{
            "id": "t1",
            "type": "SHOPEE",
            "order_number": "240501ABC",
            "created_date": "2024-05-01T00:00:00Z",
            "period_month": 5,
            "period_year": 2024,
            "total_base_amount": 24000,
            "total_sale_amount": 31000,
            "total_net_profit": 4500,
            "total_fee_amount": 2500,
            "created_by": "admin",
            "products": [{
                "id": "tp1",
                "product_id": "p1",
                "product_name": "Widget",
                "quantity": 2,
                "cost_price": 12000,
                "sale_price": 15500,
                "fee_amount": 1250
            }]
        }"#;
        let tx: OnlineTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.channel, SaleChannel::Shopee);
        assert_eq!(tx.total_quantity(), 2);
    }

    #[test]
    fn test_transaction_without_products() {
        let json = r#"{
            "id": "t2", "type": "LAZADA", "order_number": "X", "created_date": "2024-05-01",
            "period_month": 5, "period_year": 2024, "total_base_amount": 0,
            "total_sale_amount": 0, "total_net_profit": 0, "total_fee_amount": 0,
            "created_by": "admin"
        }"#;
        let tx: OnlineTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.products, None);
        assert_eq!(tx.total_quantity(), 0);
    }

    #[test]
    fn test_filters_reset_page_and_keep_size() {
        let query = OnlineTransactionsQuery::default()
            .with_page_size(50)
            .with_page(3)
            .with_filters(TransactionFilters {
                channel: Some(SaleChannel::Tiktok),
                period_month: Some(4),
                ..TransactionFilters::default()
            });
        assert_eq!(query.page_number, Some(0));
        assert_eq!(query.page_size, Some(50));
        assert_eq!(query.channel, Some(SaleChannel::Tiktok));
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let request = UpdateOnlineTransactionRequest {
            order_number: Some("NEW-1".to_string()),
            ..UpdateOnlineTransactionRequest::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({ "order_number": "NEW-1" }));
    }
}
