use crate::{
    components::{
        layout::{Layout, PageHeader},
        theme::ThemeToggle,
    },
    i18n::tr,
    pages::overview::{
        panel::StatsGrid, repository::detailed_items, view_model::use_stats_view_model,
    },
    state::preferences::use_language,
};
use leptos::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let vm = use_stats_view_model();
    let language = use_language().signal();

    view! {
        <Layout>
            <div data-page="dashboard" class="space-y-6">
                <div class="flex items-start justify-between gap-4">
                    <PageHeader title=Signal::derive(move || tr("dashboard.title", language.get()))/>
                    <div class="flex items-center gap-2 text-sm text-fg-muted">
                        <span>{move || tr("theme.label", language.get())}</span>
                        <ThemeToggle/>
                    </div>
                </div>
                <StatsGrid vm=vm items=detailed_items/>
            </div>
        </Layout>
    }
}
