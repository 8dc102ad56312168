use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

/// Document-level attributes and classes that preferences drive. Styling
/// layers react to these without re-rendering the component tree.
pub trait DocumentSurface {
    fn set_attribute(&self, name: &str, value: &str);
    fn attribute(&self, name: &str) -> Option<String>;
    fn toggle_class(&self, class: &str, enabled: bool);
    fn has_class(&self, class: &str) -> bool;
    fn prefers_dark(&self) -> bool;
}

/// The `<html>` element of the current page. Silently does nothing when no
/// document exists (host builds).
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDocument;

impl BrowserDocument {
    fn root() -> Option<web_sys::Element> {
        web_sys::window()?.document()?.document_element()
    }
}

impl DocumentSurface for BrowserDocument {
    fn set_attribute(&self, name: &str, value: &str) {
        if let Some(root) = Self::root() {
            let _ = root.set_attribute(name, value);
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        Self::root()?.get_attribute(name)
    }

    fn toggle_class(&self, class: &str, enabled: bool) {
        if let Some(root) = Self::root() {
            let list = root.class_list();
            let _ = if enabled {
                list.add_1(class)
            } else {
                list.remove_1(class)
            };
        }
    }

    fn has_class(&self, class: &str) -> bool {
        Self::root()
            .map(|root| root.class_list().contains(class))
            .unwrap_or(false)
    }

    fn prefers_dark(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok())
            .flatten()
            .map(|m| m.matches())
            .unwrap_or(false)
    }
}

#[derive(Debug, Default)]
struct Recorded {
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    prefers_dark: bool,
}

/// In-memory document used by tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingDocument {
    state: Rc<RefCell<Recorded>>,
}

impl RecordingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dark_preference() -> Self {
        let doc = Self::default();
        doc.state.borrow_mut().prefers_dark = true;
        doc
    }
}

impl DocumentSurface for RecordingDocument {
    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    fn toggle_class(&self, class: &str, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if enabled {
            state.classes.insert(class.to_string());
        } else {
            state.classes.remove(class);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.contains(class)
    }

    fn prefers_dark(&self) -> bool {
        self.state.borrow().prefers_dark
    }
}
