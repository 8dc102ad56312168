use std::rc::Rc;

use leptos::*;
use log::{debug, warn};

use crate::utils::{
    document::{BrowserDocument, DocumentSurface},
    storage::{BrowserStorage, KeyValueStore, StorageBus, LANGUAGE_KEY, THEME_KEY},
};

/// A persisted two-valued display setting.
pub trait Preference: Copy + PartialEq + std::fmt::Debug + 'static {
    const STORAGE_KEY: &'static str;

    fn parse(raw: &str) -> Option<Self>;
    fn as_str(self) -> &'static str;
    fn toggled(self) -> Self;
    /// Value to use when storage holds nothing valid.
    fn fallback(document: &dyn DocumentSurface) -> Self;
    fn apply(self, document: &dyn DocumentSurface);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(self) -> &'static str {
        self.as_str()
    }

    pub fn is_rtl(self) -> bool {
        self == Language::Ar
    }

    pub fn dir(self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }
}

impl Preference for Language {
    const STORAGE_KEY: &'static str = LANGUAGE_KEY;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }

    fn fallback(_document: &dyn DocumentSurface) -> Self {
        Language::En
    }

    fn apply(self, document: &dyn DocumentSurface) {
        document.set_attribute("dir", self.dir());
        document.set_attribute("lang", self.code());
        document.toggle_class("rtl", self.is_rtl());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Preference for Theme {
    const STORAGE_KEY: &'static str = THEME_KEY;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Honors a theme already declared on the document, then the system
    /// color scheme.
    fn fallback(document: &dyn DocumentSurface) -> Self {
        if let Some(theme) = document.attribute("data-theme").as_deref().and_then(Self::parse) {
            return theme;
        }
        if document.has_class("dark") || document.prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn apply(self, document: &dyn DocumentSurface) {
        document.set_attribute("data-theme", self.as_str());
        document.toggle_class("dark", self == Theme::Dark);
    }
}

/// Reactive, persisted preference. Every change is written through to
/// storage and applied to the document.
#[derive(Clone)]
pub struct PreferenceStore<P: Preference> {
    value: RwSignal<P>,
    storage: Rc<dyn KeyValueStore>,
    document: Rc<dyn DocumentSurface>,
    bus: StorageBus,
}

impl<P: Preference> PreferenceStore<P> {
    pub fn new(
        storage: impl KeyValueStore + 'static,
        document: impl DocumentSurface + 'static,
        bus: StorageBus,
    ) -> Self {
        let storage: Rc<dyn KeyValueStore> = Rc::new(storage);
        let document: Rc<dyn DocumentSurface> = Rc::new(document);
        let initial = match storage.get(P::STORAGE_KEY) {
            Some(raw) => P::parse(&raw).unwrap_or_else(|| {
                warn!("ignoring invalid `{}` preference: {:?}", P::STORAGE_KEY, raw);
                P::fallback(document.as_ref())
            }),
            None => P::fallback(document.as_ref()),
        };
        initial.apply(document.as_ref());
        Self {
            value: create_rw_signal(initial),
            storage,
            document,
            bus,
        }
    }

    pub fn browser(bus: StorageBus) -> Self {
        Self::new(BrowserStorage, BrowserDocument, bus)
    }

    pub fn get(&self) -> P {
        self.value.get()
    }

    pub fn get_untracked(&self) -> P {
        self.value.get_untracked()
    }

    pub fn signal(&self) -> Signal<P> {
        self.value.into()
    }

    pub fn set(&self, next: P) {
        self.value.set(next);
        next.apply(self.document.as_ref());
        if let Err(err) = self.storage.set(P::STORAGE_KEY, next.as_str()) {
            warn!("failed to persist `{}`: {}", P::STORAGE_KEY, err);
        }
        debug!("{} -> {}", P::STORAGE_KEY, next.as_str());
        self.bus.publish(P::STORAGE_KEY, Some(next.as_str()));
    }

    pub fn toggle(&self) {
        self.set(self.get_untracked().toggled());
    }

    /// Adopts values written by other tabs without writing them back.
    pub fn follow(&self) {
        let value = self.value;
        let document = Rc::clone(&self.document);
        self.bus
            .subscribe(P::STORAGE_KEY, move |raw| {
                if let Some(next) = raw.and_then(P::parse) {
                    if value.get_untracked() != next {
                        value.set(next);
                        next.apply(document.as_ref());
                    }
                }
            })
            .detach();
    }
}

pub type LanguageStore = PreferenceStore<Language>;
pub type ThemeStore = PreferenceStore<Theme>;

pub fn provide_preferences(language: LanguageStore, theme: ThemeStore) {
    provide_context(language);
    provide_context(theme);
}

pub fn use_language() -> LanguageStore {
    use_context::<LanguageStore>().unwrap_or_else(|| {
        let store = PreferenceStore::browser(StorageBus::new());
        provide_context(store.clone());
        store
    })
}

pub fn use_theme() -> ThemeStore {
    use_context::<ThemeStore>().unwrap_or_else(|| {
        let store = PreferenceStore::browser(StorageBus::new());
        provide_context(store.clone());
        store
    })
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::ssr::with_runtime;
    use crate::utils::{document::RecordingDocument, storage::MemoryStorage};

    fn language_store(storage: &MemoryStorage, doc: &RecordingDocument) -> LanguageStore {
        PreferenceStore::new(storage.clone(), doc.clone(), StorageBus::new())
    }

    #[test]
    fn unset_language_defaults_to_english() {
        with_runtime(|| {
            let store = language_store(&MemoryStorage::new(), &RecordingDocument::new());
            assert_eq!(store.get(), Language::En);
        });
    }

    #[test]
    fn corrupt_language_falls_back_to_english() {
        with_runtime(|| {
            let storage = MemoryStorage::new();
            storage.set(LANGUAGE_KEY, "fr").unwrap();
            let store = language_store(&storage, &RecordingDocument::new());
            assert_eq!(store.get(), Language::En);
        });
    }

    #[test]
    fn toggle_is_involutive_and_writes_through() {
        with_runtime(|| {
            let storage = MemoryStorage::new();
            let doc = RecordingDocument::new();
            let store = language_store(&storage, &doc);

            store.toggle();
            assert_eq!(store.get(), Language::Ar);
            assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("ar"));
            assert_eq!(doc.attribute("dir").as_deref(), Some("rtl"));
            assert!(doc.has_class("rtl"));

            store.toggle();
            assert_eq!(store.get(), Language::En);
            assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("en"));
            assert_eq!(doc.attribute("dir").as_deref(), Some("ltr"));
            assert!(!doc.has_class("rtl"));
        });
    }

    #[test]
    fn stored_language_is_applied_at_startup() {
        with_runtime(|| {
            let storage = MemoryStorage::new();
            storage.set(LANGUAGE_KEY, "ar").unwrap();
            let doc = RecordingDocument::new();
            let store = language_store(&storage, &doc);
            assert_eq!(store.get(), Language::Ar);
            assert_eq!(doc.attribute("lang").as_deref(), Some("ar"));
        });
    }

    #[test]
    fn theme_toggle_sets_attribute_and_class() {
        with_runtime(|| {
            let storage = MemoryStorage::new();
            let doc = RecordingDocument::new();
            let store: ThemeStore = PreferenceStore::new(storage.clone(), doc.clone(), StorageBus::new());
            assert_eq!(store.get(), Theme::Light);

            store.toggle();
            assert_eq!(doc.attribute("data-theme").as_deref(), Some("dark"));
            assert!(doc.has_class("dark"));
            assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));

            store.toggle();
            assert_eq!(store.get(), Theme::Light);
            assert!(!doc.has_class("dark"));
        });
    }

    #[test]
    fn theme_falls_back_to_document_then_system() {
        with_runtime(|| {
            let doc = RecordingDocument::new();
            doc.set_attribute("data-theme", "dark");
            let store: ThemeStore =
                PreferenceStore::new(MemoryStorage::new(), doc, StorageBus::new());
            assert_eq!(store.get(), Theme::Dark);

            let store: ThemeStore = PreferenceStore::new(
                MemoryStorage::new(),
                RecordingDocument::with_dark_preference(),
                StorageBus::new(),
            );
            assert_eq!(store.get(), Theme::Dark);
        });
    }

    #[test]
    fn follow_adopts_other_tab_values() {
        with_runtime(|| {
            let bus = StorageBus::new();
            let doc = RecordingDocument::new();
            let store: ThemeStore = PreferenceStore::new(MemoryStorage::new(), doc.clone(), bus.clone());
            store.follow();

            bus.publish(THEME_KEY, Some("dark"));
            assert_eq!(store.get(), Theme::Dark);
            assert!(doc.has_class("dark"));

            bus.publish(THEME_KEY, Some("sepia"));
            assert_eq!(store.get(), Theme::Dark);
        });
    }
}
