use crate::{
    api::ApiError,
    components::layout::initials,
    i18n::tr,
    pages::profile::repository::AvatarUpload,
    state::preferences::use_language,
    utils::mounted::MountGuard,
};
use leptos::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

async fn read_file(file: File) -> Result<AvatarUpload, ApiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| ApiError::unknown("Failed to read the selected file"))?;
    Ok(AvatarUpload {
        file_name: file.name(),
        mime: Some(file.type_()).filter(|mime| !mime.is_empty()),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

#[component]
pub fn AvatarPicker(
    #[prop(into)] src: Signal<Option<String>>,
    #[prop(into)] name: Signal<String>,
    #[prop(into)] pending: Signal<bool>,
    on_pick: Callback<AvatarUpload>,
    on_error: Callback<ApiError>,
) -> impl IntoView {
    let language = use_language().signal();
    let guard = MountGuard::new();

    let on_change = move |ev: leptos::ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        input.set_value("");
        guard.spawn(read_file(file), move |result| match result {
            Ok(upload) => on_pick.call(upload),
            Err(err) => on_error.call(err),
        });
    };

    view! {
        <div class="flex flex-col items-center gap-3">
            <div class="w-24 h-24 rounded-full overflow-hidden bg-surface-muted flex items-center justify-center">
                {move || match src.get() {
                    Some(url) => view! { <img src=url alt="avatar" class="w-full h-full object-cover"/> }.into_view(),
                    None => view! {
                        <span class="text-3xl font-semibold text-fg-muted">{initials(&name.get())}</span>
                    }
                    .into_view(),
                }}
            </div>
            <label class="cursor-pointer text-sm font-medium text-action-primary-bg hover:underline">
                {move || if pending.get() {
                    tr("profile.uploading", language.get())
                } else {
                    tr("profile.change_avatar", language.get())
                }}
                <input
                    type="file"
                    accept="image/*"
                    class="sr-only"
                    disabled=move || pending.get()
                    on:change=on_change
                />
            </label>
        </div>
    }
}
