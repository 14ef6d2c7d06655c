//! Back-office CLI - operator surface for the back-office backend.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the token is stored under BACKOFFICE_STATE_DIR)
//! backoffice login --username admin --password secret
//!
//! # Browse the catalog
//! backoffice products list --name gelas --page 1
//!
//! # Fill the transaction cart and submit it
//! backoffice draft set --type SHOPEE --order-number 240101ABC --date 2024-01-01
//! backoffice draft add 7f3c2a9e-... --quantity 2
//! backoffice draft submit
//!
//! # Import a marketplace export
//! backoffice transactions auto-input orders.xlsx
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` - Manage the stored session token
//! - `products` - List, show, create, edit and delete products
//! - `transactions` - List and show online transactions, upload spreadsheets
//! - `draft` - Edit and submit the transaction cart
//! - `settings` - Show the effective configuration
//!
//! Without a subcommand the products list is shown. Every command except
//! `login`, `logout` and `settings` needs a stored token.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use backoffice_admin::{AdminConfig, AppError, AppState};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod guard;
mod views;

use commands::draft::DraftCommand;
use commands::products::ProductsCommand;
use commands::session::LoginArgs;
use commands::transactions::TransactionsCommand;

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(author, version, about = "Back-office CLI for products and online transactions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a session token
    Login(LoginArgs),
    /// Forget the stored session token
    Logout,
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsCommand,
    },
    /// Browse and import online transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionsCommand,
    },
    /// Edit and submit the transaction cart
    Draft {
        #[command(subcommand)]
        action: DraftCommand,
    },
    /// Show the effective configuration
    Settings,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing(log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "backoffice_admin=info,backoffice_cli=info".into());

    let json_layer = log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_json);

    match run(cli, config).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
                tracing::error!("Failed to write output: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            if e.is_auth_failure() {
                tracing::warn!("{e}");
            } else {
                tracing::error!("Command failed: {e}");
            }
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<String, AppError> {
    let state = AppState::new(config)?;

    match cli.command {
        None => commands::products::list(&state, commands::products::ListArgs::default()).await,
        Some(Commands::Login(args)) => commands::session::login(&state, args).await,
        Some(Commands::Logout) => commands::session::logout(&state),
        Some(Commands::Products { action }) => commands::products::run(&state, action).await,
        Some(Commands::Transactions { action }) => {
            commands::transactions::run(&state, action).await
        }
        Some(Commands::Draft { action }) => commands::draft::run(&state, action).await,
        Some(Commands::Settings) => Ok(commands::settings::show(&state)),
    }
}
