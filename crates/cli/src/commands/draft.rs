//! `draft` subcommands: the transaction cart.
//!
//! Line numbers on the command line start at 1.

use backoffice_admin::{AppError, AppState};
use backoffice_core::{DraftFields, DraftLine, LinePatch, ProductId, SaleChannel};
use chrono::NaiveDate;
use clap::Subcommand;
use tracing::info;

use super::line_index;
use crate::guard::require_login;
use crate::views;

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Show the cart
    Show,
    /// Set the order fields of the cart
    Set {
        /// Sale channel
        #[arg(short = 't', long = "type")]
        channel: Option<SaleChannel>,

        /// Order number
        #[arg(short, long)]
        order_number: Option<String>,

        /// Order date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Add a product line
    Add {
        /// Product ID
        product_id: String,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Display name (looked up from the catalog when omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Change the quantity of a line
    Quantity {
        /// Line number
        line: usize,
        /// New quantity
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Line number
        line: usize,
    },
    /// Empty the cart
    Reset,
    /// Submit the cart as an online transaction
    Submit,
}

/// Run a `draft` subcommand.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` without a stored token, `BadRequest` for
/// a zero quantity or line number, `Draft` for an unknown line or a refused
/// submission.
pub async fn run(state: &AppState, command: DraftCommand) -> Result<String, AppError> {
    let token = require_login(state)?;
    let draft = state.draft();

    match command {
        DraftCommand::Show => {}
        DraftCommand::Set {
            channel,
            order_number,
            date,
        } => {
            draft.update_fields(DraftFields {
                channel,
                order_number,
                created_date: date,
            });
        }
        DraftCommand::Add {
            product_id,
            quantity,
            name,
        } => {
            check_quantity(quantity)?;
            let product_id = ProductId::from(product_id);
            let name = match name {
                Some(name) => name,
                None => state.queries().product(&product_id, Some(&token)).await?.name,
            };
            info!(product_id = %product_id, quantity, "Adding line to draft");
            draft.add_line(DraftLine::new(product_id, name, quantity));
        }
        DraftCommand::Quantity { line, quantity } => {
            check_quantity(quantity)?;
            draft.update_line(line_index(line)?, LinePatch::quantity(quantity))?;
        }
        DraftCommand::Remove { line } => {
            let removed = draft.remove_line(line_index(line)?)?;
            info!(product_id = %removed.product_id, "Removed line from draft");
        }
        DraftCommand::Reset => {
            draft.reset();
            return Ok("Cart emptied.\n".to_string());
        }
        DraftCommand::Submit => {
            if draft.snapshot().lines.is_empty() {
                return Err(AppError::BadRequest("the cart has no products".to_string()));
            }
            let body = state.queries().submit_draft(draft, Some(&token)).await?;
            return Ok(views::response_body("Transaction submitted.", &body));
        }
    }

    Ok(views::draft(&draft.snapshot()))
}

fn check_quantity(quantity: u32) -> Result<(), AppError> {
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }
    Ok(())
}
