use crate::{i18n::tr, state::preferences::use_language};
use leptos::*;

/// Error panel with an optional retry button.
#[component]
pub fn ErrorPanel(
    #[prop(into)] message: MaybeSignal<String>,
    #[prop(optional)] on_retry: Option<Callback<()>>,
) -> impl IntoView {
    let language = use_language().signal();
    view! {
        <div class="bg-status-error-bg border border-status-error-border text-status-error-text px-4 py-3 rounded mb-4 flex items-center justify-between gap-4">
            <p class="text-sm">{move || message.get()}</p>
            {on_retry.map(|retry| view! {
                <button
                    type="button"
                    class="text-sm font-semibold underline"
                    on:click=move |_| retry.call(())
                >
                    {move || tr("common.retry", language.get())}
                </button>
            })}
        </div>
    }
}

#[component]
pub fn ErrorFallback(errors: RwSignal<Errors>) -> impl IntoView {
    let language = use_language().signal();
    view! {
        <div class="max-w-xl mx-auto mt-16 p-6 rounded-lg border border-status-error-border bg-status-error-bg text-status-error-text">
            <h2 class="text-lg font-semibold">{move || tr("errors.unexpected", language.get())}</h2>
            <ul class="mt-2 list-disc list-inside text-sm">
                {move || errors.get()
                    .into_iter()
                    .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                    .collect_view()}
            </ul>
        </div>
    }
}

/// Shown instead of the application when the deployment is misconfigured.
/// Rendered before any preferences exist, so it is not localized.
#[component]
pub fn ConfigErrorScreen(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center p-6 bg-surface">
            <div class="max-w-lg w-full rounded-lg border border-status-error-border bg-status-error-bg text-status-error-text p-6 space-y-2">
                <h1 class="text-lg font-semibold">"Teamdesk cannot start"</h1>
                <p class="text-sm">{message}</p>
            </div>
        </div>
    }
}
