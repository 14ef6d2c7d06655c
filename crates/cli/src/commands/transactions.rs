//! `transactions` subcommands.

use std::path::PathBuf;

use backoffice_admin::api::SpreadsheetUpload;
use backoffice_admin::{AppError, AppState};
use backoffice_core::{OnlineTransactionsQuery, SaleChannel, TransactionFilters, TransactionId};
use clap::Subcommand;
use tracing::info;

use crate::guard::require_login;
use crate::views;

#[derive(Debug, Subcommand)]
pub enum TransactionsCommand {
    /// List online transactions
    List(ListArgs),
    /// Show one transaction with its products
    Show {
        /// Transaction ID
        id: String,
    },
    /// Import transactions from a marketplace export (.xlsx or .xls)
    AutoInput {
        /// Spreadsheet to upload
        file: PathBuf,
    },
}

#[derive(Debug, Default, clap::Args)]
pub struct ListArgs {
    /// Sale channel
    #[arg(short = 't', long = "type")]
    pub channel: Option<SaleChannel>,

    /// Order number
    #[arg(short, long)]
    pub order_number: Option<String>,

    /// Period month (1-12)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Period year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Page number
    #[arg(short, long, default_value_t = 0)]
    pub page: u32,

    /// Rows per page (default from `BACKOFFICE_PAGE_SIZE`)
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl ListArgs {
    fn into_query(self, default_page_size: u32) -> Result<OnlineTransactionsQuery, AppError> {
        let page_size = self.page_size.unwrap_or(default_page_size);
        if page_size == 0 {
            return Err(AppError::BadRequest("page size must be at least 1".to_string()));
        }
        let filters = TransactionFilters {
            channel: self.channel,
            order_number: self.order_number,
            period_month: self.month,
            period_year: self.year,
        };
        Ok(OnlineTransactionsQuery::default()
            .with_page_size(page_size)
            .with_filters(filters)
            .with_page(self.page))
    }
}

/// Run a `transactions` subcommand.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` without a stored token,
/// `UnsupportedFileType` for a non-Excel upload, otherwise the backend error.
pub async fn run(state: &AppState, command: TransactionsCommand) -> Result<String, AppError> {
    let token = require_login(state)?;
    let queries = state.queries();

    match command {
        TransactionsCommand::List(args) => {
            let query = args.into_query(state.config().page_size)?;
            let page = queries.online_transactions(&query, Some(&token)).await?;
            Ok(views::transactions_page(&page))
        }
        TransactionsCommand::Show { id } => {
            let tx = queries
                .online_transaction(&TransactionId::from(id), Some(&token))
                .await?;
            Ok(views::transaction_detail(&tx))
        }
        TransactionsCommand::AutoInput { file } => {
            let upload = SpreadsheetUpload::from_path(&file).await?;
            let file_name = upload.file_name().to_string();
            let body = queries.upload_spreadsheet(upload, Some(&token)).await?;
            info!(file = %file_name, "Spreadsheet uploaded");
            Ok(views::response_body(
                &format!("Uploaded {file_name}."),
                &body,
            ))
        }
    }
}
