use leptos::*;

mod api;
mod components;
pub mod config;
mod i18n;
mod pages;
pub mod router;
mod state;
#[cfg(test)]
mod test_support;
pub mod utils;

rust_i18n::i18n!("locales", fallback = "en");

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("starting Teamdesk frontend");

    spawn_local(async move {
        match config::init().await {
            Ok(cfg) => router::mount_app(router::AppContext::browser(&cfg)),
            Err(err) => {
                let message = err.to_string();
                mount_to_body(move || {
                    view! { <components::error::ConfigErrorScreen message=message.clone()/> }
                });
            }
        }
    });
}
