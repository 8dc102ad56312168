use leptos::*;

use crate::{components::guard::safe_return_target, utils::query::first_value};

#[derive(Clone, Copy)]
pub struct LoginFormState {
    pub username: RwSignal<String>,
    pub password: RwSignal<String>,
}

impl Default for LoginFormState {
    fn default() -> Self {
        Self {
            username: create_rw_signal(String::new()),
            password: create_rw_signal(String::new()),
        }
    }
}

/// Returns the i18n key of the first problem with the credentials.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), &'static str> {
    if username.trim().is_empty() {
        return Err("login.username_required");
    }
    if password.is_empty() {
        return Err("login.password_required");
    }
    Ok(())
}

/// Where to go after signing in: the guarded page recorded in `?from=`,
/// or the overview.
pub fn return_target(search_params: &[(String, String)]) -> String {
    safe_return_target(first_value(search_params, "from"))
}
