use crate::{
    i18n::tr,
    state::{
        auth::{use_auth, use_session},
        navigation::{use_navigation, RouteState},
        notices::use_notices,
        preferences::use_language,
        session::Session,
    },
    utils::query::encode_component,
};
use leptos::*;
use leptos_router::{use_location, Outlet};
use log::info;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect {
        to: String,
        from: String,
        /// Whether to tell the user why they were sent to sign in.
        notify: bool,
    },
}

fn is_login(location: &str) -> bool {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    path == LOGIN_PATH
}

/// `/login?from=<location>`, or `/login` itself when already there.
pub fn login_redirect(location: &str) -> String {
    if location.is_empty() || is_login(location) {
        LOGIN_PATH.to_string()
    } else {
        format!("{}?from={}", LOGIN_PATH, encode_component(location))
    }
}

pub fn evaluate_guard(session: &Session, location: &str) -> GuardDecision {
    if session.is_authenticated() {
        return GuardDecision::Allow;
    }
    GuardDecision::Redirect {
        to: login_redirect(location),
        from: location.to_string(),
        notify: !is_login(location),
    }
}

/// Where to go after signing in: the requested in-app path, or `/`.
pub fn safe_return_target(from: Option<&str>) -> String {
    match from.map(str::trim) {
        Some(target)
            if target.starts_with('/')
                && !target.starts_with("//")
                && !target.starts_with("/\\")
                && !is_login(target) =>
        {
            target.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Pathless parent of every protected route. Storage is consulted again on
/// each navigation and whenever the session changes.
#[component]
pub fn ProtectedRoute() -> impl IntoView {
    let session = use_session();
    let (auth, _) = use_auth();
    let location = use_location();
    let navigation = use_navigation();
    let notices = use_notices();
    let language = use_language();

    let decision = create_memo(move |_| {
        let _ = auth.get().is_authenticated;
        let route = RouteState::from_location(&location.pathname.get(), &location.search.get());
        evaluate_guard(&session.read(), &route.location)
    });

    create_effect(move |_| {
        if let GuardDecision::Redirect { to, from, notify } = decision.get() {
            info!("unauthenticated visit to {}, redirecting", from);
            if notify {
                notices.info(tr("guard.sign_in_required", language.get_untracked()));
            }
            navigation.replace(&to);
        }
    });

    view! {
        <Show when=move || decision.get() == GuardDecision::Allow fallback=|| ()>
            <Outlet/>
        </Show>
    }
}
