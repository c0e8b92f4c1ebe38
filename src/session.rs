//! The signed-in user, shared by everything that talks to the backend.
//!
//! A [`SessionStore`] keeps the current session in memory, mirrors it into a
//! [`SessionStorage`] and tells subscribers about every change. Another
//! process writing the same storage is picked up by [`SessionStore::sync`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Educator,
    Learner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// JWT sent as bearer token
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

/// Where the serialized session lives between runs.
pub trait SessionStorage {
    fn read(&self) -> anyhow::Result<Option<String>>;

    /// `None` clears the stored session.
    fn write(&self, value: Option<&str>) -> anyhow::Result<()>;
}

/// In-process storage. Clones share the same slot, which is how tests stand
/// in for two windows on one storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl SessionStorage for MemoryStorage {
    fn read(&self) -> anyhow::Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("session storage lock poisoned"))?;
        Ok(slot.clone())
    }

    fn write(&self, value: Option<&str>) -> anyhow::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("session storage lock poisoned"))?;
        *slot = value.map(str::to_string);
        Ok(())
    }
}

/// Session kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SessionStorage for FileStorage {
    fn read(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .context(format!("failed to read session file {}", self.path.display()))?;
        Ok(Some(content))
    }

    fn write(&self, value: Option<&str>) -> anyhow::Result<()> {
        match value {
            Some(content) => fs::write(&self.path, content)
                .context(format!("failed to write session file {}", self.path.display())),
            None if self.path.exists() => fs::remove_file(&self.path)
                .context(format!("failed to remove session file {}", self.path.display())),
            None => Ok(()),
        }
    }
}

pub type SubscriptionId = usize;

type Subscriber = Box<dyn Fn(Option<&Session>)>;

pub struct SessionStore<S> {
    storage: S,
    current: Option<Session>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: SubscriptionId,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        let current = read_session(&storage);
        Self {
            storage,
            current,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    /// Stores the session (or signs out with `None`) and notifies subscribers.
    pub fn set(&mut self, session: Option<Session>) -> anyhow::Result<()> {
        let serialized = session
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("failed to serialize session")?;
        self.storage.write(serialized.as_deref())?;

        self.current = session;
        self.notify();
        Ok(())
    }

    pub fn subscribe(&mut self, callback: impl Fn(Option<&Session>) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Re-reads storage. Returns true, after notifying subscribers, when
    /// someone else changed the session.
    pub fn sync(&mut self) -> bool {
        let stored = read_session(&self.storage);
        if stored == self.current {
            return false;
        }

        tracing::info!("session changed outside this process");
        self.current = stored;
        self.notify();
        true
    }

    fn notify(&self) {
        for (_, callback) in &self.subscribers {
            callback(self.current.as_ref());
        }
    }
}

/// Anything unreadable counts as signed out.
fn read_session<S: SessionStorage>(storage: &S) -> Option<Session> {
    match storage.read() {
        Ok(Some(raw)) => serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!("ignoring malformed stored session: {}", e))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("could not read stored session: {:#}", e);
            None
        }
    }
}
