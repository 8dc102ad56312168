use crate::{
    components::layout::{Layout, PageHeader},
    i18n::tr,
    state::preferences::use_language,
};
use leptos::*;

#[component]
pub fn ReportsPage() -> impl IntoView {
    let language = use_language().signal();
    view! {
        <Layout>
            <div data-page="reports">
                <PageHeader title=Signal::derive(move || tr("reports.title", language.get()))/>
                <div class="bg-surface-elevated p-6 rounded-xl border border-border text-fg-muted">
                    {move || tr("reports.placeholder", language.get())}
                </div>
            </div>
        </Layout>
    }
}
