//! `settings`: effective configuration and login status.

use backoffice_admin::AppState;

use crate::views;

#[must_use]
pub fn show(state: &AppState) -> String {
    views::settings(state.config(), state.auth().is_authenticated())
}
