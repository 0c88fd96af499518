//! Cached settings store
//!
//! Holds at most one live resolved document behind a mutex. `current`
//! resolves on first access only and hands out the identical `Arc` until
//! `reload` starts a new epoch. Callers receive either a complete valid
//! document or an error, never a half-merged one.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::error::ConfigError;
use super::resolver::Resolver;
use super::schema::Settings;

pub struct SettingsStore {
    resolver: Resolver,
    slot: Mutex<Option<Arc<Settings>>>,
    // Runtime custom-setting writes for the current epoch. Kept beside the
    // document rather than inside it so writes never touch the cached
    // `Arc`; a reload starts a fresh epoch and empties this map.
    custom: Mutex<BTreeMap<String, Value>>,
}

impl SettingsStore {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            slot: Mutex::new(None),
            custom: Mutex::new(BTreeMap::new()),
        }
    }

    /// The current document, resolving it first if this epoch has none.
    /// The lock is held across the miss-path resolution, so construction
    /// happens at most once per epoch even under concurrent first access.
    pub fn current(&self) -> Result<Arc<Settings>, ConfigError> {
        let mut slot = self.lock_slot();
        if let Some(doc) = slot.as_ref() {
            return Ok(Arc::clone(doc));
        }
        let doc = Arc::new(self.resolver.resolve()?);
        *slot = Some(Arc::clone(&doc));
        Ok(doc)
    }

    /// Discard the cached document and resolve a new one. The new document
    /// is built before the old one is swapped out; concurrent readers see
    /// either epoch, never an intermediate state. On failure the previous
    /// document and its custom settings stay in place.
    pub fn reload(&self) -> Result<Arc<Settings>, ConfigError> {
        let doc = Arc::new(self.resolver.resolve()?);
        *self.lock_slot() = Some(Arc::clone(&doc));
        self.lock_custom().clear();
        Ok(doc)
    }

    /// Read a custom setting, falling back to `default` when the key is
    /// absent. Runtime writes shadow values carried in the document.
    pub fn get_custom(&self, key: &str, default: Value) -> Result<Value, ConfigError> {
        if let Some(value) = self.lock_custom().get(key) {
            return Ok(value.clone());
        }
        Ok(self.current()?.custom_or(key, default))
    }

    /// Write a custom setting for the current epoch. The cached document
    /// is left untouched, so `current` keeps returning the same instance.
    pub fn set_custom(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock_custom().insert(key.into(), value.into());
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Arc<Settings>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_custom(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.custom.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
