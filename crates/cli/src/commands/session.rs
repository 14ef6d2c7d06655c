//! `login` and `logout`.

use backoffice_admin::{AppError, AppState};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// Credentials given to `backoffice login`.
#[derive(Debug, clap::Args)]
pub struct LoginArgs {
    /// Store an existing session token as-is
    #[arg(long, conflicts_with = "username")]
    pub token: Option<String>,

    /// Exchange username and password for a token
    #[arg(short, long, requires = "password")]
    pub username: Option<String>,

    /// Password for `--username`
    #[arg(short, long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Store a session token, obtained directly or from the backend.
///
/// # Errors
///
/// Returns `AppError::BadRequest` when neither a token nor a username is
/// given, the backend error when the login is refused, or a storage error.
pub async fn login(state: &AppState, args: LoginArgs) -> Result<String, AppError> {
    let token = match (args.token, args.username, args.password) {
        (Some(token), _, _) => SecretString::from(token),
        (None, Some(username), Some(password)) => {
            let password = SecretString::from(password);
            state.client().login(&username, &password).await?
        }
        _ => {
            return Err(AppError::BadRequest(
                "pass --token, or --username with --password".to_string(),
            ));
        }
    };

    if token.expose_secret().trim().is_empty() {
        return Err(AppError::BadRequest("token must not be blank".to_string()));
    }
    state.auth().login(token)?;

    info!("Logged in");
    Ok("Logged in.\n".to_string())
}

/// Forget the stored session token.
///
/// # Errors
///
/// Returns a storage error if the stored token cannot be removed.
pub fn logout(state: &AppState) -> Result<String, AppError> {
    state.auth().logout()?;
    info!("Logged out");
    Ok("Logged out.\n".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use backoffice_admin::AdminConfig;
    use backoffice_admin::storage::MemoryStore;

    use super::*;

    fn state() -> AppState {
        AppState::with_store(AdminConfig::default(), Arc::new(MemoryStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_login_with_token_then_logout() {
        let state = state();
        let args = LoginArgs {
            token: Some("abc".to_string()),
            username: None,
            password: None,
        };

        login(&state, args).await.unwrap();
        assert_eq!(state.token().unwrap().expose_secret(), "abc");

        logout(&state).unwrap();
        assert!(state.token().is_none());
    }

    #[tokio::test]
    async fn test_login_needs_credentials() {
        let args = LoginArgs {
            token: None,
            username: None,
            password: None,
        };
        let err = login(&state(), args).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_blank_token_is_rejected() {
        let state = state();
        let args = LoginArgs {
            token: Some("   ".to_string()),
            username: None,
            password: None,
        };
        assert!(login(&state, args).await.is_err());
        assert!(!state.auth().is_authenticated());
    }
}
