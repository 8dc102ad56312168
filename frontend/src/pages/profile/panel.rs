use super::{components::AvatarPicker, view_model::use_profile_view_model};
use crate::{
    components::{
        common::{Button, TextField},
        error::ErrorPanel,
        layout::{avatar_src, Layout, LoadingSpinner, PageHeader},
    },
    i18n::tr,
    state::{auth::use_api, notices::use_notices, preferences::use_language},
};
use leptos::*;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let vm = use_profile_view_model();
    let language = use_language().signal();
    let notices = use_notices();
    let base_url = use_api().base_url();
    let t = move |key: &'static str| Signal::derive(move || tr(key, language.get()));

    let avatar = Signal::derive(move || {
        vm.preview.get().or_else(|| {
            vm.user
                .get()
                .and_then(|u| avatar_src(base_url.as_deref(), u.avatar_url.as_deref()))
        })
    });
    let name = Signal::derive(move || {
        vm.user
            .get()
            .and_then(|u| u.display_name().map(str::to_string))
            .unwrap_or_default()
    });
    let saving = vm.save_action.pending();
    let uploading = vm.upload_action.pending();

    let body = move || {
        if vm.user.get().is_some() {
            return view! {
                <div class="bg-surface-elevated shadow-lg rounded-2xl p-8 border border-border space-y-6">
                    <AvatarPicker
                        src=avatar
                        name=name
                        pending=uploading
                        on_pick=Callback::new(move |upload| vm.pick_avatar(upload))
                        on_error=Callback::new(move |err: crate::api::ApiError| { notices.error(err.error); })
                    />
                    <form
                        class="space-y-4"
                        on:submit=move |ev: leptos::ev::SubmitEvent| {
                            ev.prevent_default();
                            vm.save();
                        }
                    >
                        <TextField id="firstName" label=t("profile.first_name") value=vm.form.first_name/>
                        <TextField id="lastName" label=t("profile.last_name") value=vm.form.last_name/>
                        <TextField id="email" label=t("profile.email") value=vm.form.email input_type="email"/>
                        {move || vm.error.get().map(|message| view! {
                            <p role="alert" class="text-sm text-status-error-text">{message}</p>
                        })}
                        <div class="flex justify-end">
                            <Button loading=saving attr:type="submit">{t("profile.save")}</Button>
                        </div>
                    </form>
                </div>
            }
            .into_view();
        }
        match vm.profile.get().flatten() {
            Some(Err(err)) => view! {
                <ErrorPanel message=err.error on_retry=Callback::new(move |_| vm.profile.refetch())/>
            }
            .into_view(),
            _ => view! { <LoadingSpinner/> }.into_view(),
        }
    };

    view! {
        <Layout>
            <div data-page="profile" class="max-w-3xl mx-auto">
                <PageHeader title=t("profile.title")/>
                {body}
            </div>
        </Layout>
    }
}
