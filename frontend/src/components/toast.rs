use crate::state::notices::{use_notices, NoticeKind};
use leptos::*;

fn notice_classes(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => {
            "bg-status-success-bg border-status-success-border text-status-success-text"
        }
        NoticeKind::Error => "bg-status-error-bg border-status-error-border text-status-error-text",
        NoticeKind::Info => "bg-status-info-bg border-status-info-border text-status-info-text",
    }
}

#[component]
pub fn Toasts() -> impl IntoView {
    let notices = use_notices();
    let items = notices.items();

    view! {
        <div class="fixed top-4 inset-x-0 z-[80] flex flex-col items-center gap-2 pointer-events-none" aria-live="polite">
            <For
                each=move || items.get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div
                            role="status"
                            class=format!(
                                "pointer-events-auto flex items-center gap-3 rounded-lg border px-4 py-2 shadow {}",
                                notice_classes(notice.kind),
                            )
                        >
                            <span class="text-sm">{notice.message}</span>
                            <button
                                type="button"
                                class="text-xs opacity-70 hover:opacity-100"
                                aria-label="dismiss"
                                on:click=move |_| notices.dismiss(id)
                            >
                                {"✕"}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
