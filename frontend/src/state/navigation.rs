use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use leptos::*;
use leptos_router::{use_location, use_navigate, NavigateOptions};
use log::{debug, warn};

use crate::{router::AppRoute, utils::query::parse_search};

/// Snapshot of the active route as last reported by the router.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteState {
    pub params: BTreeMap<String, String>,
    pub search_params: Vec<(String, String)>,
    /// Path plus query string, e.g. `/employee/7?tab=teams`.
    pub location: String,
}

impl RouteState {
    pub fn from_location(pathname: &str, search: &str) -> Self {
        let search = search.trim_start_matches('?');
        let location = if search.is_empty() {
            pathname.to_string()
        } else {
            format!("{}?{}", pathname, search)
        };
        Self {
            params: AppRoute::resolve(pathname).params(),
            search_params: parse_search(search),
            location,
        }
    }

    pub fn pathname(&self) -> &str {
        self.location
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(&self.location)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

type NavigateFn = Rc<dyn Fn(&str, bool)>;

/// Application-lifetime holder of the current route and the navigation
/// capability, reachable from code that lives outside any view.
#[derive(Clone)]
pub struct NavigationState {
    route: RwSignal<RouteState>,
    navigate: Rc<RefCell<Option<NavigateFn>>>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            route: create_rw_signal(RouteState::default()),
            navigate: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_route(&self, route: RouteState) {
        if self.route.get_untracked() != route {
            debug!("route -> {}", route.location);
            self.route.set(route);
        }
    }

    /// Installs the router's navigate function; `replace` selects history
    /// replacement over a push.
    pub fn set_navigate(&self, navigate: impl Fn(&str, bool) + 'static) {
        *self.navigate.borrow_mut() = Some(Rc::new(navigate));
    }

    pub fn route(&self) -> RouteState {
        self.route.get()
    }

    pub fn route_untracked(&self) -> RouteState {
        self.route.get_untracked()
    }

    pub fn navigate(&self, path: &str) {
        self.go(path, false);
    }

    pub fn replace(&self, path: &str) {
        self.go(path, true);
    }

    fn go(&self, path: &str, replace: bool) {
        let navigate = self.navigate.borrow().clone();
        match navigate {
            Some(navigate) => navigate(path, replace),
            None => {
                warn!("navigation to {} requested before the router mounted", path);
                #[cfg(target_arch = "wasm32")]
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href(path);
                }
            }
        }
    }
}

pub fn provide_navigation(state: NavigationState) {
    provide_context(state);
}

pub fn use_navigation() -> NavigationState {
    use_context::<NavigationState>().unwrap_or_else(|| {
        let state = NavigationState::new();
        provide_context(state.clone());
        state
    })
}

/// Mirrors the router's location and navigate function into
/// [`NavigationState`]. Must be rendered inside `<Router>`.
#[component]
pub fn NavigationSync() -> impl IntoView {
    let state = use_navigation();
    let navigate = use_navigate();
    state.set_navigate(move |path, replace| {
        navigate(
            path,
            NavigateOptions {
                replace,
                ..NavigateOptions::default()
            },
        )
    });

    let location = use_location();
    let pathname = location.pathname;
    let search = location.search;
    state.set_route(RouteState::from_location(
        &pathname.get_untracked(),
        &search.get_untracked(),
    ));
    create_effect(move |_| {
        state.set_route(RouteState::from_location(&pathname.get(), &search.get()));
    });
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::ssr::with_runtime;

    #[test]
    fn route_state_extracts_params_and_query() {
        let route = RouteState::from_location("/employee/42", "?tab=teams&tab=info&from=%2F");
        assert_eq!(route.param("emp_no"), Some("42"));
        assert_eq!(route.location, "/employee/42?tab=teams&tab=info&from=%2F");
        assert_eq!(route.pathname(), "/employee/42");
        assert_eq!(
            route.search_params,
            vec![
                ("tab".to_string(), "teams".to_string()),
                ("tab".to_string(), "info".to_string()),
                ("from".to_string(), "/".to_string()),
            ]
        );
    }

    #[test]
    fn static_routes_have_no_params() {
        let route = RouteState::from_location("/profile", "");
        assert!(route.params.is_empty());
        assert_eq!(route.location, "/profile");
    }

    #[test]
    fn navigate_uses_installed_function() {
        with_runtime(|| {
            let state = NavigationState::new();
            let calls = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&calls);
            state.set_navigate(move |path, replace| sink.borrow_mut().push((path.to_string(), replace)));

            state.navigate("/profile");
            state.replace("/login?from=%2Fprofile");

            assert_eq!(
                *calls.borrow(),
                vec![
                    ("/profile".to_string(), false),
                    ("/login?from=%2Fprofile".to_string(), true)
                ]
            );
        });
    }

    #[test]
    fn navigate_before_router_is_ignored_on_host() {
        with_runtime(|| {
            let state = NavigationState::new();
            state.navigate("/profile");
            assert_eq!(state.route_untracked(), RouteState::default());
        });
    }

    #[test]
    fn context_state_is_shared() {
        with_runtime(|| {
            let state = NavigationState::new();
            provide_navigation(state.clone());
            state.set_route(RouteState::from_location("/reports", ""));
            assert_eq!(use_navigation().route_untracked().location, "/reports");
        });
    }
}
