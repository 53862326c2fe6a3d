use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::kv::KeyValueStore;

/// JSON save/load over a key/value store, tolerant of absence and
/// corruption.
///
/// Persistence is strictly best-effort: a failed write is logged and
/// swallowed — it must never surface to the user or block the in-memory
/// mutation that triggered it. A failed read falls back to the caller's
/// default. Worst case either way is stale or empty user data.
pub struct StoreAdapter {
    store: Box<dyn KeyValueStore>,
}

impl StoreAdapter {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Serialize `value` and write it under `key`. Failures are logged,
    /// never returned.
    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "could not serialize state for persistence");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json) {
            warn!(key, error = %e, "could not save state");
        }
    }

    /// Read and deserialize the blob under `key`, returning `default` on
    /// absence or parse failure.
    #[must_use]
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(json) = self.store.get(key) else {
            return default;
        };
        match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "could not parse persisted state, using defaults");
                default
            }
        }
    }

    /// Drop the blob under `key`. Failures are logged, never returned.
    pub fn remove(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "could not remove persisted state");
        }
    }
}
