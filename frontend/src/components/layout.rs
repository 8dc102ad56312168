use crate::{
    components::theme::{LanguageToggle, ThemeToggle},
    config::resolve_asset_url,
    i18n::tr,
    router::NAV_ITEMS,
    state::{
        auth::{self, use_api, use_auth},
        navigation::use_navigation,
        preferences::use_language,
    },
};
use leptos::*;
use leptos_router::use_location;

/// Absolute avatar URL, resolved against the backend origin when relative.
pub fn avatar_src(base_url: Option<&str>, avatar: Option<&str>) -> Option<String> {
    let avatar = avatar.map(str::trim).filter(|a| !a.is_empty())?;
    Some(match base_url {
        Some(base) => resolve_asset_url(base, avatar),
        None => avatar.to_string(),
    })
}

/// First letter of the display name, for the avatar placeholder.
pub fn initials(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

fn is_active(current: &str, href: &str) -> bool {
    if href == "/" {
        current == "/"
    } else {
        current == href || current.starts_with(&format!("{}/", href))
    }
}

#[component]
pub fn Sidebar(open: RwSignal<bool>) -> impl IntoView {
    let (auth, _set_auth) = use_auth();
    let language = use_language().signal();
    let pathname = use_location().pathname;
    let base_url = use_api().base_url();
    let navigation = use_navigation();

    let display_name = move || {
        auth.get()
            .user
            .as_ref()
            .and_then(|u| u.display_name().map(str::to_string))
            .unwrap_or_default()
    };
    let avatar = move || {
        auth.get()
            .user
            .as_ref()
            .and_then(|u| avatar_src(base_url.as_deref(), u.avatar_url.as_deref()))
    };

    let logout_action = auth::use_logout_action();
    let logout_pending = logout_action.pending();
    create_effect(move |_| {
        if logout_action.value().get().is_some() {
            navigation.replace("/login");
        }
    });
    let on_logout = move |_| {
        if logout_pending.get_untracked() {
            return;
        }
        open.set(false);
        logout_action.dispatch(());
    };

    view! {
        <aside
            class=move || format!(
                "fixed inset-y-0 start-0 z-40 w-64 transform bg-surface-elevated border-e border-border transition-transform lg:static lg:translate-x-0 {}",
                if open.get() { "translate-x-0" } else { "-translate-x-full rtl:translate-x-full" },
            )
        >
            <div class="flex h-16 items-center justify-between px-4 border-b border-border">
                <span class="text-xl font-semibold text-fg">"Teamdesk"</span>
                <button
                    type="button"
                    class="lg:hidden text-fg-muted hover:text-fg"
                    aria-label=move || tr("nav.close_menu", language.get())
                    on:click=move |_| open.set(false)
                >
                    {"✕"}
                </button>
            </div>
            <div class="flex items-center gap-3 px-4 py-4 border-b border-border">
                <div class="w-10 h-10 rounded-full overflow-hidden bg-surface-muted flex items-center justify-center">
                    {move || match avatar() {
                        Some(src) => view! { <img src=src alt="avatar" class="w-full h-full object-cover"/> }.into_view(),
                        None => view! { <span class="font-semibold text-fg-muted">{initials(&display_name())}</span> }.into_view(),
                    }}
                </div>
                <div class="min-w-0">
                    <p class="truncate text-sm font-medium text-fg">{display_name}</p>
                    <p class="truncate text-xs text-fg-muted">
                        {move || auth.get().user.and_then(|u| u.role).unwrap_or_default()}
                    </p>
                </div>
            </div>
            <nav class="flex flex-col gap-1 p-2">
                {NAV_ITEMS
                    .iter()
                    .map(|(href, key)| {
                        let href = *href;
                        let key = *key;
                        view! {
                            <a
                                href=href
                                class=move || format!(
                                    "px-3 py-2 rounded-md text-sm font-medium {}",
                                    if is_active(&pathname.get(), href) {
                                        "bg-action-ghost-bg-hover text-fg"
                                    } else {
                                        "text-fg-muted hover:text-fg hover:bg-action-ghost-bg-hover"
                                    },
                                )
                                on:click=move |_| open.set(false)
                            >
                                {move || tr(key, language.get())}
                            </a>
                        }
                    })
                    .collect_view()}
            </nav>
            <div class="mt-auto flex items-center justify-between gap-2 p-4 border-t border-border">
                <LanguageToggle/>
                <ThemeToggle/>
            </div>
            <div class="px-4 pb-4">
                <button
                    on:click=on_logout
                    class="w-full text-start text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium disabled:opacity-50 hover:bg-action-ghost-bg-hover"
                    disabled=move || logout_pending.get()
                >
                    {move || tr("nav.logout", language.get())}
                </button>
            </div>
        </aside>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let sidebar_open = create_rw_signal(false);
    let language = use_language().signal();
    view! {
        <div class="min-h-screen bg-surface flex">
            <Sidebar open=sidebar_open/>
            <Show when=move || sidebar_open.get()>
                <button
                    type="button"
                    aria-label="close"
                    class="fixed inset-0 z-30 bg-overlay-backdrop lg:hidden"
                    on:click=move |_| sidebar_open.set(false)
                ></button>
            </Show>
            <div class="flex-1 min-w-0">
                <header class="lg:hidden flex h-16 items-center px-4 border-b border-border bg-surface-elevated">
                    <button
                        type="button"
                        class="p-2 rounded-md text-fg-muted hover:text-fg hover:bg-action-ghost-bg-hover"
                        aria-expanded=move || sidebar_open.get().to_string()
                        on:click=move |_| sidebar_open.update(|open| *open = !*open)
                    >
                        <span class="sr-only">{move || tr("nav.open_menu", language.get())}</span>
                        <svg class="h-6 w-6" xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke="currentColor">
                            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 6h16M4 12h16M4 18h16"/>
                        </svg>
                    </button>
                </header>
                <main class="max-w-7xl mx-auto py-6 px-4 sm:px-6 lg:px-8">
                    {children()}
                </main>
            </div>
        </div>
    }
}

#[component]
pub fn PageHeader(
    #[prop(into)] title: MaybeSignal<String>,
    #[prop(optional, into)] subtitle: Option<MaybeSignal<String>>,
) -> impl IntoView {
    view! {
        <div class="mb-6">
            <h1 class="text-2xl font-bold text-fg">{move || title.get()}</h1>
            {subtitle.map(|s| view! { <p class="mt-1 text-sm text-fg-muted">{move || s.get()}</p> })}
        </div>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::state::auth::AuthProvider;
    use crate::test_support::{helpers::test_context, ssr::render_to_string};
    use crate::utils::storage::{KeyValueStore, ACCESS_TOKEN_KEY, USER_KEY};
    use leptos_router::{Router, RouterIntegrationContext, ServerIntegration};

    #[test]
    fn sidebar_shows_user_and_navigation() {
        let html = render_to_string(move || {
            let (ctx, storage, _) = test_context();
            storage.set(ACCESS_TOKEN_KEY, "abc").unwrap();
            storage
                .set(
                    USER_KEY,
                    r#"{"id":1,"username":"alice","firstName":"Alice","avatarUrl":"/uploads/a.png"}"#,
                )
                .unwrap();
            ctx.provide();
            provide_context(RouterIntegrationContext::new(ServerIntegration {
                path: "http://localhost/employees".into(),
            }));
            view! {
                <AuthProvider>
                    <Router>
                        <Layout>"content"</Layout>
                    </Router>
                </AuthProvider>
            }
        });
        assert!(html.contains("Alice"));
        assert!(html.contains("http://backend.test/uploads/a.png"));
        assert!(html.contains("Employees"));
        assert!(html.contains("Sign out"));
        assert!(html.contains("content"));
    }
}
