//! Login guard for protected commands.

use backoffice_admin::{AppError, AppState};
use secrecy::SecretString;

/// Return the stored session token, or fail with a hint to log in.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when no non-blank token is stored.
pub fn require_login(state: &AppState) -> Result<SecretString, AppError> {
    if !state.auth().is_authenticated() {
        return Err(AppError::Unauthorized(
            "not logged in, run `backoffice login` first".to_string(),
        ));
    }
    state
        .token()
        .ok_or_else(|| AppError::Unauthorized("session token disappeared".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use backoffice_admin::storage::MemoryStore;
    use secrecy::ExposeSecret;

    use super::*;

    fn state() -> AppState {
        AppState::with_store(backoffice_admin::AdminConfig::default(), Arc::new(MemoryStore::new()))
            .unwrap()
    }

    #[test]
    fn test_rejects_without_token() {
        let err = require_login(&state()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(err.to_string().contains("backoffice login"));
    }

    #[test]
    fn test_returns_stored_token() {
        let state = state();
        state
            .auth()
            .login(SecretString::from("abc".to_string()))
            .unwrap();
        assert_eq!(require_login(&state).unwrap().expose_secret(), "abc");
    }
}
