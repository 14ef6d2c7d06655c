//! Shared client state.
//!
//! Built once at start-up and handed to every consumer, so tests can build
//! isolated instances over a [`MemoryStore`](crate::storage::MemoryStore).

use std::sync::Arc;

use secrecy::SecretString;

use crate::api::BackofficeClient;
use crate::auth::AuthState;
use crate::config::AdminConfig;
use crate::draft::DraftHolder;
use crate::error::AppError;
use crate::queries::Queries;
use crate::storage::{ClientStore, FileStore};

/// Application state shared across commands.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    auth: AuthState,
    draft: DraftHolder,
    queries: Queries,
}

impl AppState {
    /// Build state over the file store in `config.state_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the state directory or HTTP client cannot be set up.
    pub fn new(config: AdminConfig) -> Result<Self, AppError> {
        let store = Arc::new(FileStore::open(&config.state_dir)?);
        Self::with_store(config, store)
    }

    /// Build state over an arbitrary store.
    ///
    /// # Errors
    ///
    /// Returns error if the stored token cannot be read or the HTTP client
    /// fails to build.
    pub fn with_store(config: AdminConfig, store: Arc<dyn ClientStore>) -> Result<Self, AppError> {
        let client = BackofficeClient::new(&config)?;
        let auth = AuthState::load(Arc::clone(&store))?;
        let draft = DraftHolder::load(store, client.http());
        let queries = Queries::new(client, &config);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                draft,
                queries,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.inner.auth
    }

    #[must_use]
    pub fn draft(&self) -> &DraftHolder {
        &self.inner.draft
    }

    #[must_use]
    pub fn queries(&self) -> &Queries {
        &self.inner.queries
    }

    #[must_use]
    pub fn client(&self) -> &BackofficeClient {
        self.inner.queries.client()
    }

    /// Current session token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner.auth.token()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}
