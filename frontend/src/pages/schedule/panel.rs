use super::utils::{today, week_of, weekday_key};
use crate::{
    components::layout::{Layout, PageHeader},
    i18n::tr,
    state::preferences::use_language,
};
use chrono::Datelike;
use leptos::*;

#[component]
pub fn SchedulePage() -> impl IntoView {
    let language = use_language().signal();
    let today = today();

    view! {
        <Layout>
            <div data-page="schedule" class="space-y-4">
                <PageHeader title=Signal::derive(move || tr("schedule.title", language.get()))/>
                <div class="grid grid-cols-1 sm:grid-cols-7 gap-2">
                    {week_of(today)
                        .into_iter()
                        .map(|day| {
                            let is_today = day == today;
                            view! {
                                <div
                                    class="rounded-lg border p-3 bg-surface-elevated"
                                    class:border-action-primary-bg=is_today
                                    class:border-border=!is_today
                                >
                                    <p class="text-xs text-fg-muted">
                                        {move || tr(weekday_key(day.weekday()), language.get())}
                                    </p>
                                    <p class="text-lg font-semibold text-fg">
                                        {day.format("%Y-%m-%d").to_string()}
                                    </p>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
                <div class="bg-surface-elevated p-6 rounded-xl border border-border text-fg-muted">
                    {move || tr("schedule.placeholder", language.get())}
                </div>
            </div>
        </Layout>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::{helpers::test_context, ssr::render_to_string};
    use leptos_router::{Router, RouterIntegrationContext, ServerIntegration};

    #[test]
    fn schedule_lists_the_current_week() {
        let html = render_to_string(move || {
            test_context().0.provide();
            provide_context(RouterIntegrationContext::new(ServerIntegration {
                path: "http://localhost/schedule".into(),
            }));
            view! { <Router><SchedulePage/></Router> }
        });
        assert!(html.contains("data-page=\"schedule\""));
        assert!(html.contains(&today().format("%Y-%m-%d").to_string()));
        assert!(html.contains("Monday"));
    }
}
