//! Catalog product records and request bodies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::channel::ShopeeCategory;
use super::id::ProductId;
use super::pagination::DEFAULT_PAGE_SIZE;
use super::price::Rupiah;

/// A catalog product as returned by the backend.
///
/// `shopee_sale_price` is computed by the backend from the cost price, the
/// gross-profit percentage and the Shopee category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub cost_price: Rupiah,
    pub shopee_sale_price: Rupiah,
    pub shopee_category: ShopeeCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_profit_percentage: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub varian_gross_profit_percentage: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopee_varian_name: Option<String>,
    pub shopee_name: String,
}

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// The backend accepts the same shape for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub cost_price: Rupiah,
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_profit_percentage: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub varian_gross_profit_percentage: Option<Decimal>,
    pub shopee_category: ShopeeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopee_varian_name: Option<String>,
    pub shopee_name: String,
}

pub type CreateProductRequest = ProductInput;
pub type UpdateProductRequest = ProductInput;

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            cost_price: product.cost_price,
            gross_profit_percentage: product.gross_profit_percentage,
            varian_gross_profit_percentage: product.varian_gross_profit_percentage,
            shopee_category: product.shopee_category,
            shopee_varian_name: product.shopee_varian_name.clone(),
            shopee_name: product.shopee_name.clone(),
        }
    }
}

/// Query parameters of `GET /products`.
///
/// Unset fields are left out of the query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for ProductsQuery {
    fn default() -> Self {
        Self {
            page_number: Some(0),
            page_size: Some(DEFAULT_PAGE_SIZE),
            name: None,
        }
    }
}

impl ProductsQuery {
    /// Change the name search. Returns to the first page.
    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.trim().is_empty());
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

    /// Move to another page, keeping the search.
    #[must_use]
    pub const fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }
}
