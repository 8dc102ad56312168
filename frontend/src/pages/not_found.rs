use crate::{i18n::tr, state::preferences::use_language};
use leptos::*;
use leptos_router::use_location;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let language = use_language().signal();
    let pathname = use_location().pathname;
    view! {
        <div data-page="not-found" class="min-h-[60vh] flex flex-col items-center justify-center gap-4 p-8 text-center">
            <p class="text-6xl font-bold text-fg-muted">"404"</p>
            <h1 class="text-2xl font-semibold text-fg">{move || tr("not_found.title", language.get())}</h1>
            <p class="text-sm text-fg-muted">
                <code>{move || pathname.get()}</code>
            </p>
            <a href="/" class="text-action-primary-bg underline">
                {move || tr("not_found.back_home", language.get())}
            </a>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::{helpers::test_context, ssr::render_to_string};
    use leptos_router::{RouterIntegrationContext, ServerIntegration};

    #[test]
    fn not_found_offers_a_way_home() {
        let html = render_to_string(move || {
            test_context().0.provide();
            provide_context(RouterIntegrationContext::new(ServerIntegration {
                path: "http://localhost/missing/page".into(),
            }));
            view! { <leptos_router::Router><NotFoundPage/></leptos_router::Router> }
        });
        assert!(html.contains("data-page=\"not-found\""));
        assert!(html.contains("404"));
        assert!(html.contains("href=\"/\""));
    }
}
