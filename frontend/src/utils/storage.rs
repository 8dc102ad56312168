use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
};

use log::debug;
use thiserror::Error;
use web_sys::{Storage, Window};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_KEY: &str = "user";
pub const LANGUAGE_KEY: &str = "lang";
pub const THEME_KEY: &str = "theme";

/// Keys mirrored from other browser contexts by [`listen_cross_tab`].
pub const SYNCED_KEYS: &[&str] = &[ACCESS_TOKEN_KEY, USER_KEY, LANGUAGE_KEY, THEME_KEY];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("no window object")]
    NoWindow,
    #[error("localStorage is unavailable")]
    Unavailable,
    #[error("failed to write `{0}`")]
    Write(String),
}

pub fn window() -> Result<Window, StorageError> {
    web_sys::window().ok_or(StorageError::NoWindow)
}

pub fn local_storage() -> Result<Storage, StorageError> {
    window()?
        .local_storage()
        .map_err(|_| StorageError::Unavailable)?
        .ok_or(StorageError::Unavailable)
}

/// String key-value persistence shared by the session and preference stores.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`. Every call re-acquires the handle so a missing
/// storage (private mode, host build) degrades to "absent" instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        local_storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

type Listener = Rc<dyn Fn(Option<&str>)>;

#[derive(Default)]
struct BusInner {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, String, Listener)>>,
}

/// Publish/subscribe channel over persisted keys. Writers publish after
/// touching storage; observers in this context (and, through
/// [`listen_cross_tab`], writes from other tabs) are notified per key.
#[derive(Clone, Default)]
pub struct StorageBus {
    inner: Rc<BusInner>,
}

impl std::fmt::Debug for StorageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBus")
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl StorageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, key: &str, listener: impl Fn(Option<&str>) + 'static) -> Subscription {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, key.to_string(), Rc::new(listener)));
        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    pub fn publish(&self, key: &str, value: Option<&str>) {
        // Snapshot first: a listener may subscribe or unsubscribe while running.
        let matching: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| k == key)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        debug!("storage bus: `{}` changed ({} observers)", key, matching.len());
        for listener in matching {
            listener(value);
        }
    }

    pub fn listener_count(&self, key: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| k == key)
            .count()
    }
}

/// Unregisters its observer when dropped. Call [`Subscription::detach`] to
/// keep the observer for the lifetime of the bus.
#[must_use = "dropping a Subscription unregisters the observer"]
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Subscription {
    pub fn detach(mut self) {
        self.bus = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _, _)| *id != self.id);
        }
    }
}

/// Forwards `storage` events raised by other browser contexts onto `bus`.
#[cfg(target_arch = "wasm32")]
pub fn listen_cross_tab(bus: &StorageBus) {
    use wasm_bindgen::{closure::Closure, JsCast};

    let win = match window() {
        Ok(win) => win,
        Err(err) => {
            log::warn!("cross-tab sync disabled: {}", err);
            return;
        }
    };
    let bus = bus.clone();
    let closure = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
        let Some(key) = event.key() else {
            return;
        };
        if SYNCED_KEYS.contains(&key.as_str()) {
            debug!("cross-tab update for `{}`", key);
            bus.publish(&key, event.new_value().as_deref());
        }
    }) as Box<dyn FnMut(_)>);
    if win
        .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("failed to attach storage listener");
    }
    closure.forget();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn listen_cross_tab(_bus: &StorageBus) {}
