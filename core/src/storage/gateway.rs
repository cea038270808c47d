//! Flat key-value persistence gateway

use hashbrown::HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Synchronous string-keyed storage supplied by the host.
///
/// Writes are expected to be cheap; the engine persists after every
/// mutation and on every timer tick.
pub trait PersistenceGateway {
    fn save(&mut self, key: &str, value: &str);
    fn load(&self, key: &str) -> Option<String>;
    fn remove(&mut self, key: &str);
}

/// Serialize `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize>(gateway: &mut dyn PersistenceGateway, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => gateway.save(key, &json),
        Err(err) => {
            tracing::warn!(key, %err, "failed to serialize state, write skipped");
        }
    }
}

/// Load and parse the JSON record under `key`.
///
/// A corrupt or unparseable record is indistinguishable from a missing
/// one: the caller gets `None` and starts fresh.
pub fn load_json<T: DeserializeOwned>(gateway: &dyn PersistenceGateway, key: &str) -> Option<T> {
    let raw = gateway.load(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, %err, "discarding corrupt persisted record");
            None
        }
    }
}

/// In-memory gateway for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    entries: HashMap<String, String>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
