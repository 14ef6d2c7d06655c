//! Plain-text renderers for command output.
//!
//! Every renderer returns a `String`; `main` writes it to stdout.

use std::fmt::Write;

use backoffice_admin::AdminConfig;
use backoffice_core::format::{format_date, format_naive_date, format_to_rupiah, month_name};
use backoffice_core::{OnlineTransaction, Page, PageMetadata, Product, TransactionDraft};

const NAME_WIDTH: usize = 28;

// =============================================================================
// Products
// =============================================================================

/// Product listing with a pagination footer.
#[must_use]
pub fn products_page(page: &Page<Product>) -> String {
    if page.data.is_empty() {
        return "No products found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<NAME_WIDTH$}  {:>3}  {:>14}  {:>14}  {:>7}",
        "ID", "NAME", "CAT", "COST", "SHOPEE PRICE", "GP %"
    );
    for product in &page.data {
        let _ = writeln!(
            out,
            "{:<36}  {:<NAME_WIDTH$}  {:>3}  {:>14}  {:>14}  {:>7}",
            product.id,
            truncate(&product.name, NAME_WIDTH),
            product.shopee_category,
            format_to_rupiah(product.cost_price.amount()),
            format_to_rupiah(product.shopee_sale_price.amount()),
            product.gross_profit_percentage.normalize(),
        );
    }
    out.push_str(&pagination_footer(&page.metadata, page.data.len()));
    out
}

/// Full record of one product.
#[must_use]
pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "  ID:                 {}", product.id);
    let _ = writeln!(out, "  Shopee name:        {}", product.shopee_name);
    if let Some(variant) = &product.shopee_varian_name {
        let _ = writeln!(out, "  Shopee variant:     {variant}");
    }
    let _ = writeln!(out, "  Category:           {}", product.shopee_category);
    let _ = writeln!(
        out,
        "  Cost price:         {}",
        format_to_rupiah(product.cost_price.amount())
    );
    let _ = writeln!(
        out,
        "  Shopee sale price:  {}",
        format_to_rupiah(product.shopee_sale_price.amount())
    );
    let _ = writeln!(
        out,
        "  Gross profit:       {}%",
        product.gross_profit_percentage.normalize()
    );
    if let Some(variant_gp) = product.varian_gross_profit_percentage {
        let _ = writeln!(out, "  Variant profit:     {}%", variant_gp.normalize());
    }
    out
}

// =============================================================================
// Online transactions
// =============================================================================

/// Transaction listing with a pagination footer.
#[must_use]
pub fn transactions_page(page: &Page<OnlineTransaction>) -> String {
    if page.data.is_empty() {
        return "No transactions found for the selected filters.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20}  {:<9}  {:<18}  {:<14}  {:>14}  {:>14}  {:>14}  {:>12}  ID",
        "ORDER", "TYPE", "DATE", "PERIOD", "BASE", "SALE", "NET PROFIT", "FEE"
    );
    for tx in &page.data {
        let _ = writeln!(
            out,
            "{:<20}  {:<9}  {:<18}  {:<14}  {:>14}  {:>14}  {:>14}  {:>12}  {}",
            truncate(&tx.order_number, 20),
            tx.channel,
            format_date(&tx.created_date),
            period(tx.period_month, tx.period_year),
            format_to_rupiah(tx.total_base_amount.amount()),
            format_to_rupiah(tx.total_sale_amount.amount()),
            format_to_rupiah(tx.total_net_profit.amount()),
            format_to_rupiah(tx.total_fee_amount.amount()),
            tx.id,
        );
    }
    out.push_str(&pagination_footer(&page.metadata, page.data.len()));
    out
}

/// Transaction header, totals and product rows.
#[must_use]
pub fn transaction_detail(tx: &OnlineTransaction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {}", tx.order_number);
    let _ = writeln!(out, "  Type:        {}", tx.channel);
    let _ = writeln!(out, "  Date:        {}", format_date(&tx.created_date));
    let _ = writeln!(out, "  Period:      {}", period(tx.period_month, tx.period_year));
    let _ = writeln!(out, "  Created by:  {}", tx.created_by);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Base amount: {}", format_to_rupiah(tx.total_base_amount.amount()));
    let _ = writeln!(out, "  Sale amount: {}", format_to_rupiah(tx.total_sale_amount.amount()));
    let _ = writeln!(out, "  Net profit:  {}", format_to_rupiah(tx.total_net_profit.amount()));
    let _ = writeln!(out, "  Fee amount:  {}", format_to_rupiah(tx.total_fee_amount.amount()));
    let _ = writeln!(out);

    match tx.products.as_deref() {
        Some(products) if !products.is_empty() => {
            let _ = writeln!(
                out,
                "  {:<NAME_WIDTH$}  {:>5}  {:>14}  {:>14}  {:>12}",
                "PRODUCT", "QTY", "COST", "SALE", "FEE"
            );
            for row in products {
                let _ = writeln!(
                    out,
                    "  {:<NAME_WIDTH$}  {:>5}  {:>14}  {:>14}  {:>12}",
                    truncate(&row.product_name, NAME_WIDTH),
                    row.quantity,
                    format_to_rupiah(row.cost_price.amount()),
                    format_to_rupiah(row.sale_price.amount()),
                    format_to_rupiah(row.fee_amount.amount()),
                );
            }
            let _ = writeln!(out, "  Total quantity: {}", tx.total_quantity());
        }
        _ => {
            let _ = writeln!(out, "  No products in this transaction.");
        }
    }
    out
}

// =============================================================================
// Draft
// =============================================================================

/// The transaction cart, lines numbered from 1.
#[must_use]
pub fn draft(draft: &TransactionDraft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Transaction Cart ({} items)", draft.total_items());
    let _ = writeln!(
        out,
        "  Type:          {}",
        draft.channel.map_or_else(|| "-".to_string(), |c| c.to_string())
    );
    let _ = writeln!(
        out,
        "  Order number:  {}",
        if draft.order_number.is_empty() {
            "-"
        } else {
            &draft.order_number
        }
    );
    let _ = writeln!(
        out,
        "  Date:          {}",
        draft.created_date.map_or_else(|| "-".to_string(), format_naive_date)
    );
    let _ = writeln!(out);

    if draft.lines.is_empty() {
        let _ = writeln!(out, "  No products added yet.");
        return out;
    }
    for (i, line) in draft.lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<NAME_WIDTH$}  x{:<4}  ({})",
            i + 1,
            truncate(&line.product_name, NAME_WIDTH),
            line.quantity,
            line.product_id,
        );
    }
    out
}

// =============================================================================
// Settings
// =============================================================================

/// Effective client configuration.
#[must_use]
pub fn settings(config: &AdminConfig, logged_in: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "API URL:     {}", config.api_url);
    let _ = writeln!(out, "State dir:   {}", config.state_dir.display());
    let _ = writeln!(out, "Page size:   {}", config.page_size);
    let _ = writeln!(out, "Cache TTL:   {}s", config.cache_ttl.as_secs());
    let _ = writeln!(
        out,
        "Timeout:     {}",
        config
            .http_timeout
            .map_or_else(|| "transport default".to_string(), |t| format!("{}s", t.as_secs()))
    );
    let _ = writeln!(out, "Logged in:   {}", if logged_in { "yes" } else { "no" });
    out
}

/// Response body of a mutation, if it carried one.
#[must_use]
pub fn response_body(message: &str, body: &serde_json::Value) -> String {
    if body.is_null() {
        return format!("{message}\n");
    }
    let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
    format!("{message}\n{pretty}\n")
}

// =============================================================================
// Helpers
// =============================================================================

/// "Showing page X of Y" plus navigation hints.
#[must_use]
pub fn pagination_footer(metadata: &PageMetadata, items_on_page: usize) -> String {
    let mut out = String::new();
    let _ = write!(out, "\nShowing page {}", metadata.page_number);
    if let Some(total_pages) = metadata.total_pages {
        let _ = write!(out, " of {}", total_pages.max(1));
    }
    if let Some(total) = metadata.total_count {
        let _ = write!(out, " ({total} total)");
    }
    out.push('\n');

    if metadata.has_previous() {
        let _ = writeln!(out, "Previous: --page {}", metadata.page_number - 1);
    }
    if metadata.has_next(items_on_page) {
        let _ = writeln!(out, "Next:     --page {}", metadata.page_number.saturating_add(1));
    }
    out
}

fn period(month: u32, year: i32) -> String {
    month_name(month).map_or_else(|| format!("{month}/{year}"), |name| format!("{name} {year}"))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
