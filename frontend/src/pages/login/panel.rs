use super::view_model::use_login_view_model;
use crate::{
    components::{
        common::{Button, TextField},
        theme::LanguageToggle,
    },
    i18n::tr,
    state::preferences::use_language,
};
use leptos::*;

#[component]
pub fn LoginPanel() -> impl IntoView {
    let vm = use_login_view_model();
    let language = use_language().signal();
    let pending = vm.pending();
    let t = move |key: &'static str| Signal::derive(move || tr(key, language.get()));

    view! {
        <div data-page="login" class="flex min-h-screen items-center justify-center p-4 bg-surface">
            <form
                class="bg-surface-elevated shadow-xl rounded-2xl p-8 w-full max-w-md border border-border space-y-6"
                on:submit=vm.submit()
            >
                <div class="flex justify-between items-center">
                    <h2 class="text-3xl font-bold text-fg">{t("login.welcome")}</h2>
                    <LanguageToggle/>
                </div>
                <p class="text-center text-fg-muted">{t("login.subtitle")}</p>
                <Show when=move || pending.get()>
                    <p class="text-center text-status-info-text font-medium animate-pulse">
                        {t("login.signing_in")}
                    </p>
                </Show>
                <TextField
                    id="username"
                    label=t("login.username")
                    value=vm.form.username
                    placeholder=t("login.username_placeholder")
                />
                <TextField
                    id="password"
                    label=t("login.password")
                    value=vm.form.password
                    input_type="password"
                    placeholder=t("login.password_placeholder")
                />
                {move || vm.error.get().map(|message| view! {
                    <p role="alert" class="text-sm text-status-error-text">{message}</p>
                })}
                <Button class="w-full" loading=pending attr:type="submit">
                    {t("login.submit")}
                </Button>
            </form>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::{helpers::test_context, ssr::render_to_string};

    #[test]
    fn login_panel_renders_form() {
        let html = render_to_string(move || {
            test_context().0.provide();
            view! { <LoginPanel/> }
        });
        assert!(html.contains("data-page=\"login\""));
        assert!(html.contains("id=\"username\""));
        assert!(html.contains("type=\"password\""));
        assert!(html.contains("Sign in"));
        assert!(html.contains("العربية"));
    }
}
