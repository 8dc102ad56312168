use super::{
    components::{TeamCard, TeamEditor},
    repository::Directory,
    utils::filter_employees,
    view_model::{use_employees_view_model, EmployeesViewModel},
};
use crate::{
    components::{
        cards::{CardTone, StatCard},
        common::{Button, TextField},
        confirm_dialog::ConfirmDialog,
        empty_state::EmptyState,
        error::ErrorPanel,
        layout::{Layout, LoadingSpinner, PageHeader},
    },
    i18n::tr,
    router::AppRoute,
    state::preferences::use_language,
};
use leptos::*;

#[component]
fn DirectoryView(directory: Directory, vm: EmployeesViewModel) -> impl IntoView {
    let language = use_language().signal();
    let t = move |key: &'static str| Signal::derive(move || tr(key, language.get()));

    let teams = if directory.teams.is_empty() {
        view! {
            <EmptyState
                title=t("employees.no_teams")
                description=t("employees.no_teams_hint")
            />
        }
        .into_view()
    } else {
        view! {
            <div class="grid grid-cols-1 gap-4 md:grid-cols-2 xl:grid-cols-3">
                {directory
                    .teams
                    .iter()
                    .cloned()
                    .map(|team| view! { <TeamCard team=team vm=vm/> })
                    .collect_view()}
            </div>
        }
        .into_view()
    };

    let unassigned = directory.available.clone();
    let available = move || {
        let list = filter_employees(&unassigned, &vm.search.get());
        if list.is_empty() {
            return view! {
                <p class="py-4 text-sm text-fg-muted">{t("employees.no_available")}</p>
            }
            .into_view();
        }
        list.into_iter()
            .map(|emp| {
                let href = AppRoute::Employee {
                    emp_no: emp.emp_no.to_string(),
                }
                .path();
                view! {
                    <li class="py-2">
                        <a href=href class="flex items-center justify-between gap-3 hover:underline">
                            <span class="truncate text-sm font-medium text-fg">{emp.name_ar.clone()}</span>
                            <span class="truncate text-xs text-fg-muted">{emp.job_label().to_string()}</span>
                        </a>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <dl class="grid grid-cols-1 gap-5 sm:grid-cols-2 mb-6">
            <StatCard
                label=t("employees.available_total")
                value=Some(directory.available.len() as i64)
                tone=CardTone::Success
            />
            <StatCard
                label=t("employees.teams_total")
                value=Some(directory.teams.len() as i64)
                tone=CardTone::Info
            />
        </dl>
        <section class="space-y-4 mb-8">{teams}</section>
        <section class="bg-surface-elevated rounded-lg shadow border border-border p-4 space-y-3">
            <h2 class="text-lg font-semibold text-fg">{t("employees.available_title")}</h2>
            <TextField
                id="employeeSearch"
                label=t("employees.search")
                value=vm.search
                input_type="search"
                placeholder=t("employees.search_placeholder")
            />
            <ul class="divide-y divide-border">{available}</ul>
        </section>
    }
}

#[component]
pub fn EmployeesPage() -> impl IntoView {
    let vm = use_employees_view_model();
    let language = use_language().signal();
    let t = move |key: &'static str| Signal::derive(move || tr(key, language.get()));
    let deleting = vm.delete_action.pending();

    let body = move || match vm.loaded() {
        None => view! { <LoadingSpinner/> }.into_view(),
        Some(Err(err)) => view! {
            <ErrorPanel message=err.error on_retry=Callback::new(move |_| vm.retry())/>
        }
        .into_view(),
        Some(Ok(directory)) => view! { <DirectoryView directory=directory vm=vm/> }.into_view(),
    };

    let delete_message = Signal::derive(move || {
        let name = vm
            .pending_delete
            .get()
            .map(|team| team.name)
            .unwrap_or_default();
        format!("{} {}", tr("employees.delete_confirm", language.get()), name)
    });

    view! {
        <Layout>
            <div data-page="employees">
                <div class="flex flex-wrap items-start justify-between gap-4">
                    <PageHeader title=t("employees.title") subtitle=t("employees.subtitle")/>
                    <Button on:click=move |_| vm.open_create()>{t("employees.new_team")}</Button>
                </div>
                {body}
                <TeamEditor vm=vm/>
                <ConfirmDialog
                    is_open=Signal::derive(move || vm.pending_delete.get().is_some())
                    title=t("employees.delete_title")
                    message=delete_message
                    on_confirm=Callback::new(move |_| vm.confirm_delete())
                    on_cancel=Callback::new(move |_| vm.cancel_delete())
                    confirm_label=t("employees.delete")
                    confirm_disabled=deleting
                    destructive=true
                />
            </div>
        </Layout>
    }
}
