//! `products` subcommands.

use backoffice_admin::{AppError, AppState};
use backoffice_core::{ProductId, ProductInput, ProductsQuery, ShopeeCategory};
use clap::Subcommand;
use rust_decimal::Decimal;
use tracing::info;

use super::parse_rupiah;
use crate::guard::require_login;
use crate::views;

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally searching by name
    List(ListArgs),
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
    /// Create a product
    Create(CreateArgs),
    /// Change fields of a product; omitted fields keep their value
    Edit {
        /// Product ID
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
}

#[derive(Debug, Default, clap::Args)]
pub struct ListArgs {
    /// Name search
    #[arg(short, long)]
    pub name: Option<String>,

    /// Page number
    #[arg(short, long, default_value_t = 0)]
    pub page: u32,

    /// Rows per page (default from `BACKOFFICE_PAGE_SIZE`)
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Debug, clap::Args)]
pub struct CreateArgs {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Name of the listing on Shopee
    #[arg(long)]
    pub shopee_name: String,

    /// Cost price, e.g. `25.000` or `Rp 25.000`
    #[arg(long)]
    pub cost: String,

    /// Gross profit percentage
    #[arg(long)]
    pub gross_profit: Decimal,

    /// Shopee fee category (A-E)
    #[arg(long, default_value_t = ShopeeCategory::A)]
    pub category: ShopeeCategory,

    /// Shopee variant name
    #[arg(long)]
    pub variant_name: Option<String>,

    /// Gross profit percentage of the variant
    #[arg(long)]
    pub variant_gross_profit: Option<Decimal>,
}

#[derive(Debug, Default, clap::Args)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub shopee_name: Option<String>,
    #[arg(long)]
    pub cost: Option<String>,
    #[arg(long)]
    pub gross_profit: Option<Decimal>,
    #[arg(long)]
    pub category: Option<ShopeeCategory>,
    #[arg(long)]
    pub variant_name: Option<String>,
    #[arg(long)]
    pub variant_gross_profit: Option<Decimal>,
}

impl CreateArgs {
    fn into_input(self) -> Result<ProductInput, AppError> {
        Ok(ProductInput {
            cost_price: parse_rupiah("cost", &self.cost)?,
            name: self.name,
            gross_profit_percentage: self.gross_profit,
            varian_gross_profit_percentage: self.variant_gross_profit,
            shopee_category: self.category,
            shopee_varian_name: self.variant_name.filter(|v| !v.trim().is_empty()),
            shopee_name: self.shopee_name,
        })
    }
}

impl EditArgs {
    /// Overlay the given fields on `input`.
    fn apply(self, input: &mut ProductInput) -> Result<(), AppError> {
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(shopee_name) = self.shopee_name {
            input.shopee_name = shopee_name;
        }
        if let Some(cost) = self.cost {
            input.cost_price = parse_rupiah("cost", &cost)?;
        }
        if let Some(gross_profit) = self.gross_profit {
            input.gross_profit_percentage = gross_profit;
        }
        if let Some(category) = self.category {
            input.shopee_category = category;
        }
        if let Some(variant_name) = self.variant_name {
            input.shopee_varian_name = Some(variant_name).filter(|v| !v.trim().is_empty());
        }
        if let Some(variant_gross_profit) = self.variant_gross_profit {
            input.varian_gross_profit_percentage = Some(variant_gross_profit);
        }
        Ok(())
    }

    const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.shopee_name.is_none()
            && self.cost.is_none()
            && self.gross_profit.is_none()
            && self.category.is_none()
            && self.variant_name.is_none()
            && self.variant_gross_profit.is_none()
    }
}

/// Run a `products` subcommand.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` without a stored token, otherwise the
/// backend or validation error.
pub async fn run(state: &AppState, command: ProductsCommand) -> Result<String, AppError> {
    let token = require_login(state)?;
    let queries = state.queries();

    match command {
        ProductsCommand::List(args) => list(state, args).await,
        ProductsCommand::Show { id } => {
            let product = queries.product(&ProductId::from(id), Some(&token)).await?;
            Ok(views::product_detail(&product))
        }
        ProductsCommand::Create(args) => {
            let input = args.into_input()?;
            let body = queries.create_product(&input, Some(&token)).await?;
            info!(name = %input.name, "Product created");
            Ok(views::response_body("Product created.", &body))
        }
        ProductsCommand::Edit { id, fields } => {
            if fields.is_empty() {
                return Err(AppError::BadRequest("nothing to change".to_string()));
            }
            let id = ProductId::from(id);
            let current = queries.product(&id, Some(&token)).await?;
            let mut input = ProductInput::from(&current);
            fields.apply(&mut input)?;

            let body = queries.update_product(&id, &input, Some(&token)).await?;
            info!(product_id = %id, "Product updated");
            Ok(views::response_body("Product updated.", &body))
        }
        ProductsCommand::Delete { id } => {
            let id = ProductId::from(id);
            queries.delete_product(&id, Some(&token)).await?;
            info!(product_id = %id, "Product deleted");
            Ok(format!("Product {id} deleted.\n"))
        }
    }
}

/// The products listing, also shown when no subcommand is given.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` without a stored token, otherwise the
/// backend error.
pub async fn list(state: &AppState, args: ListArgs) -> Result<String, AppError> {
    let token = require_login(state)?;
    let page_size = args.page_size.unwrap_or(state.config().page_size);
    if page_size == 0 {
        return Err(AppError::BadRequest("page size must be at least 1".to_string()));
    }

    let query = ProductsQuery::default()
        .with_page_size(page_size)
        .with_name(args.name)
        .with_page(args.page);
    let page = state.queries().products(&query, Some(&token)).await?;
    Ok(views::products_page(&page))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use backoffice_core::{Product, Rupiah};

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Gelas plastik".to_string(),
            cost_price: Rupiah::new(1_000),
            shopee_sale_price: Rupiah::new(1_500),
            shopee_category: ShopeeCategory::B,
            gross_profit_percentage: Decimal::from(20),
            varian_gross_profit_percentage: None,
            shopee_varian_name: Some("16oz".to_string()),
            shopee_name: "Gelas Plastik 16oz".to_string(),
        }
    }

    #[test]
    fn test_create_args_parse_cost() {
        let args = CreateArgs {
            name: "Widget".to_string(),
            shopee_name: "Widget Shopee".to_string(),
            cost: "Rp 25.000".to_string(),
            gross_profit: Decimal::from_str("12.5").unwrap(),
            category: ShopeeCategory::C,
            variant_name: Some(String::new()),
            variant_gross_profit: None,
        };
        let input = args.into_input().unwrap();
        assert_eq!(input.cost_price, Rupiah::new(25_000));
        assert_eq!(input.shopee_category, ShopeeCategory::C);
        assert!(input.shopee_varian_name.is_none());
    }

    #[test]
    fn test_edit_overlays_only_given_fields() {
        let mut input = ProductInput::from(&product());
        let fields = EditArgs {
            cost: Some("2.000".to_string()),
            category: Some(ShopeeCategory::D),
            ..EditArgs::default()
        };
        assert!(!fields.is_empty());

        fields.apply(&mut input).unwrap();
        assert_eq!(input.cost_price, Rupiah::new(2_000));
        assert_eq!(input.shopee_category, ShopeeCategory::D);
        assert_eq!(input.name, "Gelas plastik");
        assert_eq!(input.shopee_varian_name.as_deref(), Some("16oz"));
    }

    #[test]
    fn test_edit_rejects_bad_cost() {
        let mut input = ProductInput::from(&product());
        let fields = EditArgs {
            cost: Some("free".to_string()),
            ..EditArgs::default()
        };
        assert!(fields.apply(&mut input).is_err());
        assert_eq!(input.cost_price, Rupiah::new(1_000));
    }

    #[test]
    fn test_empty_edit() {
        assert!(EditArgs::default().is_empty());
    }
}
