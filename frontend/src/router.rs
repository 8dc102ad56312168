use std::collections::BTreeMap;

use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::*;

use crate::{
    api::ApiClient,
    components::{
        error::ErrorFallback,
        guard::{evaluate_guard, GuardDecision, ProtectedRoute},
        toast::Toasts,
    },
    config::AppConfig,
    i18n::tr,
    pages::{
        dashboard::DashboardPage, employee::EmployeePage, employees::EmployeesPage,
        login::LoginPage, not_found::NotFoundPage, overview::OverviewPage, profile::ProfilePage,
        reports::ReportsPage, schedule::SchedulePage,
    },
    state::{
        auth::AuthProvider,
        navigation::{provide_navigation, NavigationState, NavigationSync},
        notices::Notices,
        preferences::{provide_preferences, LanguageStore, PreferenceStore, ThemeStore},
        session::{Session, SessionStore},
    },
    utils::{
        document::DocumentSurface,
        query::{decode_component, encode_component},
        storage::{listen_cross_tab, BrowserStorage, KeyValueStore, StorageBus},
    },
};

/// Every screen of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    Overview,
    Dashboard,
    Profile,
    Reports,
    Schedule,
    Employees,
    Employee { emp_no: String },
    NotFound,
}

impl AppRoute {
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => AppRoute::Overview,
            ["login"] => AppRoute::Login,
            ["dashboard"] => AppRoute::Dashboard,
            ["profile"] => AppRoute::Profile,
            ["reports"] => AppRoute::Reports,
            ["schedule"] => AppRoute::Schedule,
            ["employees"] => AppRoute::Employees,
            ["employee", emp_no] => AppRoute::Employee {
                emp_no: decode_component(emp_no),
            },
            _ => AppRoute::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            AppRoute::Login => "/login".into(),
            AppRoute::Overview => "/".into(),
            AppRoute::Dashboard => "/dashboard".into(),
            AppRoute::Profile => "/profile".into(),
            AppRoute::Reports => "/reports".into(),
            AppRoute::Schedule => "/schedule".into(),
            AppRoute::Employees => "/employees".into(),
            AppRoute::Employee { emp_no } => format!("/employee/{}", encode_component(emp_no)),
            AppRoute::NotFound => "/404".into(),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, AppRoute::Login | AppRoute::NotFound)
    }

    pub fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let AppRoute::Employee { emp_no } = self {
            params.insert("emp_no".to_string(), emp_no.clone());
        }
        params
    }
}

/// Links shown in the sidebar, in display order, with their i18n keys.
pub const NAV_ITEMS: &[(&str, &str)] = &[
    ("/", "nav.overview"),
    ("/dashboard", "nav.dashboard"),
    ("/employees", "nav.employees"),
    ("/schedule", "nav.schedule"),
    ("/reports", "nav.reports"),
    ("/profile", "nav.profile"),
];

/// Services created once at boot and shared through Leptos context.
#[derive(Clone)]
pub struct AppContext {
    pub bus: StorageBus,
    pub session: SessionStore,
    pub api: ApiClient,
    pub language: LanguageStore,
    pub theme: ThemeStore,
    pub navigation: NavigationState,
    pub notices: Notices,
}

impl AppContext {
    pub fn new<S, D>(storage: S, document: D, api: ApiClient) -> Self
    where
        S: KeyValueStore + Clone + 'static,
        D: DocumentSurface + Clone + 'static,
    {
        let bus = StorageBus::new();
        let session = SessionStore::new(storage.clone(), bus.clone());
        let language: LanguageStore =
            PreferenceStore::new(storage.clone(), document.clone(), bus.clone());
        let theme: ThemeStore = PreferenceStore::new(storage, document, bus.clone());
        let navigation = NavigationState::new();
        let notices = Notices::new();

        let hook_navigation = navigation.clone();
        let hook_language = language.clone();
        let api = api
            .with_session(session.clone())
            .on_unauthorized(move || {
                let location = hook_navigation.route_untracked().location;
                if let GuardDecision::Redirect { to, notify, .. } =
                    evaluate_guard(&Session::default(), &location)
                {
                    if notify {
                        notices.error(tr("guard.session_expired", hook_language.get_untracked()));
                    }
                    hook_navigation.replace(&to);
                }
            });

        Self {
            bus,
            session,
            api,
            language,
            theme,
            navigation,
            notices,
        }
    }

    /// Wires the context to `localStorage`, the live document and other tabs.
    pub fn browser(config: &AppConfig) -> Self {
        let ctx = Self::new(
            BrowserStorage,
            crate::utils::document::BrowserDocument,
            ApiClient::from_config(config),
        );
        listen_cross_tab(&ctx.bus);
        ctx.language.follow();
        ctx.theme.follow();
        ctx
    }

    pub fn provide(&self) {
        provide_context(self.session.clone());
        provide_context(self.api.clone());
        provide_preferences(self.language.clone(), self.theme.clone());
        provide_navigation(self.navigation.clone());
        provide_context(self.notices);
    }
}

pub fn mount_app(ctx: AppContext) {
    mount_to_body(move || app_root(ctx));
}

pub fn app_root(ctx: AppContext) -> impl IntoView {
    provide_meta_context();
    ctx.provide();
    view! {
        <AuthProvider>
            <Router>
                <AppRoutes/>
            </Router>
        </AuthProvider>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes>
            <Route path="" view=AppShell>
                <Route path="login" view=LoginPage/>
                <Route path="" view=ProtectedRoute>
                    <Route path="" view=OverviewPage/>
                    <Route path="dashboard" view=DashboardPage/>
                    <Route path="profile" view=ProfilePage/>
                    <Route path="reports" view=ReportsPage/>
                    <Route path="schedule" view=SchedulePage/>
                    <Route path="employees" view=EmployeesPage/>
                    <Route path="employee/:emp_no" view=EmployeePage/>
                </Route>
                <Route path="*any" view=NotFoundPage/>
            </Route>
        </Routes>
    }
}

/// Root of every route: notices, error boundary and footer.
#[component]
fn AppShell() -> impl IntoView {
    let language = crate::state::preferences::use_language().signal();
    view! {
        <Title text="Teamdesk"/>
        <NavigationSync/>
        <Toasts/>
        <ErrorBoundary fallback=|errors| view! { <ErrorFallback errors=errors/> }>
            <Outlet/>
        </ErrorBoundary>
        <footer class="py-4 text-center text-xs text-fg-muted">
            {move || tr("footer.copyright", language.get())}
        </footer>
    }
}
