use leptos::*;
use uuid::Uuid;

pub const NOTICE_TTL_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
}

/// Queue of transient, non-blocking messages.
#[derive(Debug, Clone, Copy)]
pub struct Notices {
    items: RwSignal<Vec<Notice>>,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

impl Notices {
    pub fn new() -> Self {
        Self {
            items: create_rw_signal(Vec::new()),
        }
    }

    pub fn items(&self) -> Signal<Vec<Notice>> {
        self.items.into()
    }

    pub fn push(&self, kind: NoticeKind, message: impl Into<String>) -> Uuid {
        let notice = Notice {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        };
        let id = notice.id;
        self.items.update(|items| items.push(notice));
        self.expire_later(id);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(NoticeKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(NoticeKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(NoticeKind::Info, message)
    }

    pub fn dismiss(&self, id: Uuid) {
        self.items.update(|items| items.retain(|n| n.id != id));
    }

    #[cfg(target_arch = "wasm32")]
    fn expire_later(&self, id: Uuid) {
        let notices = *self;
        gloo_timers::callback::Timeout::new(NOTICE_TTL_MS, move || notices.dismiss(id)).forget();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn expire_later(&self, _id: Uuid) {}
}

pub fn use_notices() -> Notices {
    use_context::<Notices>().unwrap_or_else(|| {
        let notices = Notices::new();
        provide_context(notices);
        notices
    })
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::ssr::with_runtime;

    #[test]
    fn push_and_dismiss() {
        with_runtime(|| {
            let notices = Notices::new();
            let first = notices.success("Saved");
            let second = notices.error("Failed");
            assert_eq!(notices.items().get_untracked().len(), 2);

            notices.dismiss(first);
            let items = notices.items().get_untracked();
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].id, second);
            assert_eq!(items[0].kind, NoticeKind::Error);
        });
    }

    #[test]
    fn ids_are_unique() {
        with_runtime(|| {
            let notices = Notices::new();
            assert_ne!(notices.info("a"), notices.info("a"));
        });
    }
}
