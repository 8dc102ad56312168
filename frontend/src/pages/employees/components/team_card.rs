use crate::{
    api::Team,
    components::common::{Button, ButtonVariant},
    i18n::tr,
    pages::employees::view_model::EmployeesViewModel,
    router::AppRoute,
    state::preferences::use_language,
};
use leptos::*;

#[component]
pub fn TeamCard(team: Team, vm: EmployeesViewModel) -> impl IntoView {
    let language = use_language().signal();
    let t = move |key: &'static str| Signal::derive(move || tr(key, language.get()));
    let team_id = team.id;
    let edit_team = team.clone();
    let delete_team = team.clone();
    let member_count = team.members.len();

    let members = team
        .members
        .into_iter()
        .map(|member| {
            let emp_no = member.emp_no.clone();
            let href = AppRoute::Employee {
                emp_no: emp_no.to_string(),
            }
            .path();
            let removing = {
                let emp_no = emp_no.clone();
                move || vm.is_removing(team_id, &emp_no)
            };
            view! {
                <li class="flex items-center justify-between gap-2 py-2">
                    <a href=href class="min-w-0 text-sm text-fg hover:underline">
                        <span class="block truncate font-medium">{member.name_ar.clone()}</span>
                        <span class="block truncate text-xs text-fg-muted">{member.job_label().to_string()}</span>
                    </a>
                    <button
                        type="button"
                        class="text-xs text-status-error-text hover:underline disabled:opacity-50"
                        disabled=removing
                        on:click=move |_| vm.remove_member(team_id, emp_no.clone())
                    >
                        {move || tr("employees.remove_member", language.get())}
                    </button>
                </li>
            }
        })
        .collect_view();

    view! {
        <article class="bg-surface-elevated rounded-lg shadow border border-border p-4 space-y-3">
            <header class="flex items-start justify-between gap-3">
                <div class="min-w-0">
                    <h3 class="truncate text-lg font-semibold text-fg">{team.name}</h3>
                    {team.description.filter(|d| !d.trim().is_empty()).map(|d| view! {
                        <p class="text-sm text-fg-muted">{d}</p>
                    })}
                </div>
                <span class="shrink-0 rounded-full bg-surface-muted px-2 py-0.5 text-xs text-fg-muted">
                    {member_count}
                </span>
            </header>
            {if member_count == 0 {
                view! { <p class="text-sm text-fg-muted">{t("employees.no_members")}</p> }.into_view()
            } else {
                view! { <ul class="divide-y divide-border">{members}</ul> }.into_view()
            }}
            <footer class="flex justify-end gap-2">
                <Button
                    variant=ButtonVariant::Secondary
                    on:click=move |_| vm.open_edit(edit_team.clone())
                >
                    {t("employees.edit")}
                </Button>
                <Button
                    variant=ButtonVariant::Danger
                    on:click=move |_| vm.request_delete(delete_team.clone())
                >
                    {t("employees.delete")}
                </Button>
            </footer>
        </article>
    }
}
