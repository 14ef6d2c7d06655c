//! Credential exchange for a session token.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiError, BackofficeClient};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

impl BackofficeClient {
    /// Exchange a username and password for a bearer token.
    ///
    /// The token is returned, not stored; hand it to
    /// [`crate::auth::AuthState::login`].
    ///
    /// # Errors
    ///
    /// Returns the backend message (fallback `"Login failed"`), or
    /// `ApiError::Parse` if the response carries no usable token.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, ApiError> {
        let request = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        let response: LoginResponse = self
            .post("/auth/login", &request, None, "Login failed")
            .await?;

        if response.token.trim().is_empty() {
            return Err(ApiError::Parse("Login response has an empty token".to_string()));
        }
        tracing::info!("Login succeeded");
        Ok(SecretString::from(response.token))
    }
}
