use crate::{
    components::common::{Button, ButtonVariant, TextField},
    i18n::tr,
    pages::employees::view_model::EmployeesViewModel,
    state::preferences::use_language,
};
use leptos::ev::KeyboardEvent;
use leptos::*;

/// Modal form for creating a team or editing one, with member selection.
#[component]
pub fn TeamEditor(vm: EmployeesViewModel) -> impl IntoView {
    let language = use_language().signal();
    let t = move |key: &'static str| Signal::derive(move || tr(key, language.get()));
    let dialog = vm.dialog;
    let saving = vm.save_action.pending();

    let title = move || {
        let key = if dialog.editing.get().is_some() {
            "employees.edit_team"
        } else {
            "employees.new_team"
        };
        tr(key, language.get())
    };

    let candidates = move || {
        let list = vm.candidates();
        if list.is_empty() {
            return view! {
                <p class="py-4 text-center text-sm text-fg-muted">{t("employees.no_candidates")}</p>
            }
            .into_view();
        }
        list.into_iter()
            .map(|emp| {
                let emp_no = emp.emp_no.clone();
                let checked = {
                    let emp_no = emp_no.clone();
                    move || dialog.is_selected(&emp_no)
                };
                view! {
                    <label class="flex items-center gap-3 py-2 cursor-pointer">
                        <input
                            type="checkbox"
                            class="h-4 w-4 rounded border-border"
                            prop:checked=checked
                            on:change=move |_| dialog.toggle(&emp_no)
                        />
                        <span class="min-w-0">
                            <span class="block truncate text-sm text-fg">{emp.name_ar.clone()}</span>
                            <span class="block truncate text-xs text-fg-muted">{emp.job_label().to_string()}</span>
                        </span>
                    </label>
                }
            })
            .collect_view()
    };

    view! {
        <Show when=move || dialog.open.get()>
            <div class="fixed inset-0 z-[60] flex items-center justify-center p-4">
                <button
                    type="button"
                    aria-label=move || tr("common.close", language.get())
                    class="absolute inset-0 bg-overlay-backdrop"
                    on:click=move |_| dialog.close()
                ></button>
                <form
                    role="dialog"
                    aria-modal="true"
                    class="relative z-[61] w-full max-w-lg max-h-[90vh] overflow-y-auto rounded-lg bg-surface-elevated shadow-xl border border-border p-6 space-y-4"
                    on:keydown=move |ev: KeyboardEvent| {
                        if ev.key() == "Escape" {
                            ev.prevent_default();
                            dialog.close();
                        }
                    }
                    on:submit=move |ev: leptos::ev::SubmitEvent| {
                        ev.prevent_default();
                        vm.submit();
                    }
                >
                    <h2 class="text-lg font-semibold text-fg">{title}</h2>
                    <TextField id="teamName" label=t("employees.team_name") value=dialog.name/>
                    <div class="space-y-1">
                        <label for="teamDescription" class="block text-sm font-medium text-fg">
                            {t("employees.team_description")}
                        </label>
                        <textarea
                            id="teamDescription"
                            rows="2"
                            class="block w-full rounded-md border border-border bg-surface px-3 py-2 text-sm text-fg"
                            prop:value=move || dialog.description.get()
                            on:input=move |ev| dialog.description.set(event_target_value(&ev))
                        ></textarea>
                    </div>
                    <TextField
                        id="memberSearch"
                        label=t("employees.members")
                        value=dialog.search
                        input_type="search"
                        placeholder=t("employees.search_placeholder")
                    />
                    <div class="max-h-64 overflow-y-auto divide-y divide-border rounded-md border border-border px-3">
                        {candidates}
                    </div>
                    {move || dialog.error.get().map(|message| view! {
                        <p role="alert" class="text-sm text-status-error-text">{message}</p>
                    })}
                    <div class="flex justify-end gap-2">
                        <Button
                            variant=ButtonVariant::Secondary
                            attr:type="button"
                            on:click=move |_| dialog.close()
                        >
                            {t("employees.cancel")}
                        </Button>
                        <Button loading=saving attr:type="submit">{t("employees.save")}</Button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
