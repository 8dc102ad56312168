use std::rc::Rc;

use log::warn;

use crate::{
    api::UserProfile,
    utils::storage::{
        BrowserStorage, KeyValueStore, StorageBus, StorageError, Subscription, ACCESS_TOKEN_KEY,
        USER_KEY,
    },
};

/// Authenticated-user context. Token presence is the only authorization
/// signal the client uses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub fn parse_user(raw: Option<&str>) -> Option<UserProfile> {
    let raw = raw?;
    match serde_json::from_str::<Option<UserProfile>>(raw) {
        Ok(user) => user,
        Err(err) => {
            warn!("discarding unreadable stored user: {}", err);
            None
        }
    }
}

fn normalize_token(raw: Option<String>) -> Option<String> {
    raw.filter(|t| !t.trim().is_empty())
}

/// Persistent token + user snapshot under the `accessToken` / `user` keys.
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStore>,
    bus: StorageBus,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("bus", &self.bus).finish()
    }
}

impl SessionStore {
    pub fn new(storage: impl KeyValueStore + 'static, bus: StorageBus) -> Self {
        Self {
            storage: Rc::new(storage),
            bus,
        }
    }

    pub fn browser(bus: StorageBus) -> Self {
        Self::new(BrowserStorage, bus)
    }

    pub fn bus(&self) -> &StorageBus {
        &self.bus
    }

    pub fn token(&self) -> Option<String> {
        normalize_token(self.storage.get(ACCESS_TOKEN_KEY))
    }

    pub fn user(&self) -> Option<UserProfile> {
        parse_user(self.storage.get(USER_KEY).as_deref())
    }

    /// Never fails; unreadable data reads as absent.
    pub fn read(&self) -> Session {
        Session {
            token: self.token(),
            user: self.user(),
        }
    }

    pub fn write(&self, token: &str, user: Option<&UserProfile>) -> Result<(), StorageError> {
        if token.trim().is_empty() {
            return Err(StorageError::Write(ACCESS_TOKEN_KEY.to_string()));
        }
        self.storage.set(ACCESS_TOKEN_KEY, token)?;
        self.bus.publish(ACCESS_TOKEN_KEY, Some(token));
        self.update_user(user)
    }

    /// Replaces the cached profile (profile edits, avatar changes).
    pub fn update_user(&self, user: Option<&UserProfile>) -> Result<(), StorageError> {
        match user {
            Some(user) => {
                let raw = serde_json::to_string(user)
                    .map_err(|_| StorageError::Write(USER_KEY.to_string()))?;
                self.storage.set(USER_KEY, &raw)?;
                self.bus.publish(USER_KEY, Some(&raw));
            }
            None => {
                self.storage.remove(USER_KEY)?;
                self.bus.publish(USER_KEY, None);
            }
        }
        Ok(())
    }

    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(ACCESS_TOKEN_KEY) {
            warn!("failed to clear token: {}", err);
        }
        if let Err(err) = self.storage.remove(USER_KEY) {
            warn!("failed to clear user: {}", err);
        }
        self.bus.publish(ACCESS_TOKEN_KEY, None);
        self.bus.publish(USER_KEY, None);
    }

    /// Observes profile changes from this tab or any other.
    pub fn subscribe_user(&self, on_change: impl Fn(Option<UserProfile>) + 'static) -> Subscription {
        self.bus
            .subscribe(USER_KEY, move |raw| on_change(parse_user(raw)))
    }

    pub fn subscribe_token(&self, on_change: impl Fn(Option<String>) + 'static) -> Subscription {
        self.bus.subscribe(ACCESS_TOKEN_KEY, move |raw| {
            on_change(normalize_token(raw.map(str::to_string)))
        })
    }
}
