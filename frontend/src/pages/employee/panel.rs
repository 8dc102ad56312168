use crate::{
    api::{ApiError, Employee},
    components::{
        error::ErrorPanel,
        layout::{Layout, LoadingSpinner, PageHeader},
    },
    i18n::tr,
    state::{auth::use_api, preferences::use_language},
    utils::mounted::MountGuard,
};
use leptos::*;
use leptos_router::use_params_map;

/// Hourly rate with two decimals; absent rates read as zero.
pub fn format_rate(rate: Option<f64>) -> String {
    format!("{:.2}", rate.unwrap_or(0.0))
}

#[component]
fn EmployeeDetails(employee: Employee) -> impl IntoView {
    let language = use_language().signal();
    let t = move |key: &'static str| move || tr(key, language.get());
    let status_key = if employee.work_status {
        "employee.active"
    } else {
        "employee.inactive"
    };
    let rows = vec![
        ("employee.name_en", employee.name_en.clone().unwrap_or_default()),
        ("employee.name_ar", employee.name_ar.clone()),
        ("employee.emp_no", employee.emp_no.to_string()),
        ("employee.hourly_rate", format_rate(employee.per_hour)),
        (
            "employee.job_code",
            employee
                .job_code
                .as_ref()
                .map(crate::api::value_label)
                .unwrap_or_default(),
        ),
        ("employee.work_place", employee.work_place_label()),
    ];

    view! {
        <div class="bg-surface-elevated p-6 rounded-lg shadow border border-border">
            <dl class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                {rows
                    .into_iter()
                    .map(|(key, value)| view! {
                        <div>
                            <dt class="text-sm font-medium text-fg-muted">{t(key)}</dt>
                            <dd class="mt-1 text-sm text-fg">{value}</dd>
                        </div>
                    })
                    .collect_view()}
                <div>
                    <dt class="text-sm font-medium text-fg-muted">{t("employee.status")}</dt>
                    <dd class="mt-1 text-sm text-fg">{t(status_key)}</dd>
                </div>
            </dl>
        </div>
    }
}

#[component]
pub fn EmployeePage() -> impl IntoView {
    let api = use_api();
    let guard = MountGuard::new();
    let language = use_language().signal();
    let params = use_params_map();
    let emp_no = create_memo(move |_| params.with(|p| p.get("emp_no").cloned().unwrap_or_default()));

    let employee = create_resource(
        move || emp_no.get(),
        move |emp_no| {
            let api = api.clone();
            let guard = guard.clone();
            async move {
                if emp_no.trim().is_empty() {
                    return Some(Err(ApiError::validation("Employee ID not provided")));
                }
                guard.run(api.get_employee(&emp_no)).await
            }
        },
    );

    view! {
        <Layout>
            <div data-page="employee" class="space-y-4">
                <PageHeader
                    title=Signal::derive(move || tr("employee.title", language.get()))
                    subtitle=Signal::derive(move || format!("#{}", emp_no.get()))
                />
                {move || match employee.get().flatten() {
                    None => view! { <LoadingSpinner/> }.into_view(),
                    Some(Err(err)) => view! {
                        <ErrorPanel message=err.error on_retry=Callback::new(move |_| employee.refetch())/>
                    }
                    .into_view(),
                    Some(Ok(found)) => view! { <EmployeeDetails employee=found/> }.into_view(),
                }}
            </div>
        </Layout>
    }
}
