use crate::{
    i18n::tr,
    state::preferences::{use_language, use_theme, Language, Theme},
};
use leptos::*;

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let theme = use_theme();
    let language = use_language().signal();
    let current = theme.signal();

    let on_click = move |_| theme.toggle();

    view! {
        <button
            type="button"
            class="relative inline-flex h-6 w-11 items-center rounded-full bg-gray-200 dark:bg-gray-700 transition-colors focus:outline-none focus:ring-2 focus:ring-primary-500 focus:ring-offset-2"
            on:click=on_click
            aria-label=move || tr("theme.toggle", language.get())
            aria-pressed=move || (current.get() == Theme::Dark).to_string()
        >
            <span class="sr-only">{move || tr("theme.toggle", language.get())}</span>
            <span
                class=move || {
                    if current.get() == Theme::Dark {
                        "translate-x-6 bg-primary-600"
                    } else {
                        "translate-x-1 bg-white"
                    }
                }
                class="inline-block h-4 w-4 transform rounded-full bg-white transition-transform shadow-theme-switch"
            />
        </button>
    }
}

#[component]
pub fn LanguageToggle() -> impl IntoView {
    let language = use_language();
    let current = language.signal();
    let on_click = move |_| language.toggle();

    view! {
        <button
            type="button"
            class="px-3 py-1 rounded-md border border-border bg-surface-muted hover:bg-surface-elevated text-sm transition"
            on:click=on_click
        >
            // Label names the language a click switches to.
            {move || match current.get() {
                Language::En => "العربية",
                Language::Ar => "English",
            }}
        </button>
    }
}
