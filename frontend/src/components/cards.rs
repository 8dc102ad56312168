use leptos::*;

/// Accent of a stat card; maps onto the status colour tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CardTone {
    #[default]
    Neutral,
    Info,
    Success,
    Warning,
}

impl CardTone {
    pub fn classes(&self) -> &'static str {
        match self {
            CardTone::Neutral => "border-border",
            CardTone::Info => "border-status-info-border",
            CardTone::Success => "border-status-success-border",
            CardTone::Warning => "border-status-warning-border",
        }
    }
}

pub fn display_value(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

/// Labelled counter; `None` renders a dash while the value is unknown.
#[component]
pub fn StatCard(
    #[prop(into)] label: MaybeSignal<String>,
    #[prop(into)] value: MaybeSignal<Option<i64>>,
    #[prop(optional)] tone: CardTone,
) -> impl IntoView {
    view! {
        <div class=format!(
            "bg-surface-elevated overflow-hidden shadow rounded-lg border-s-4 {}",
            tone.classes(),
        )>
            <div class="px-4 py-5 sm:p-6">
                <dt class="text-sm font-medium text-fg-muted truncate">{move || label.get()}</dt>
                <dd class="mt-1 text-3xl font-semibold text-fg">
                    {move || display_value(value.get())}
                </dd>
            </div>
        </div>
    }
}
