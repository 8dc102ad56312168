use super::{
    repository::{summary_items, StatItem},
    view_model::{use_stats_view_model, StatsViewModel},
};
use crate::{
    components::{
        cards::StatCard,
        error::ErrorPanel,
        layout::{Layout, LoadingSpinner, PageHeader},
    },
    i18n::tr,
    state::preferences::use_language,
};
use leptos::*;

/// Loading spinner, error panel with retry, or the cards built by `items`.
#[component]
pub fn StatsGrid(
    vm: StatsViewModel,
    items: fn(&crate::api::DashboardStats) -> Vec<StatItem>,
) -> impl IntoView {
    let language = use_language().signal();
    move || match vm.loaded() {
        None => view! { <LoadingSpinner/> }.into_view(),
        Some(Err(err)) => view! {
            <ErrorPanel message=err.error on_retry=Callback::new(move |_| vm.retry())/>
        }
        .into_view(),
        Some(Ok(stats)) => view! {
            <dl class="grid grid-cols-1 gap-5 sm:grid-cols-2 lg:grid-cols-3">
                {items(&stats)
                    .into_iter()
                    .map(|item| view! {
                        <StatCard
                            label=Signal::derive(move || tr(item.label_key, language.get()))
                            value=Some(item.value)
                            tone=item.tone
                        />
                    })
                    .collect_view()}
            </dl>
        }
        .into_view(),
    }
}

#[component]
pub fn OverviewPage() -> impl IntoView {
    let vm = use_stats_view_model();
    let language = use_language().signal();

    view! {
        <Layout>
            <div data-page="overview">
                <PageHeader
                    title=Signal::derive(move || tr("overview.title", language.get()))
                    subtitle=Signal::derive(move || tr("overview.subtitle", language.get()))
                />
                <StatsGrid vm=vm items=summary_items/>
            </div>
        </Layout>
    }
}
