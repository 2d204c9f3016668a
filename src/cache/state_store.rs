use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::clock::Clock;
use super::keys::{Namespace, StorageKey};
use super::storage::KeyValueStorage;
use crate::constants::STALENESS_HORIZON_SECS;
use crate::utils::StorageError;

/// A stored value together with the moment it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState<T> {
    pub data: T,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Saved vertical scroll offset of a page.
pub type ScrollRecord = PersistedState<f64>;

/// Save/load values under a key, treating anything older than the horizon
/// as absent. Holds no state of its own beyond handles to storage and clock.
///
/// Storage failures never reach the caller: `save` logs and returns, `load`
/// logs and reports nothing stored.
#[derive(Debug, Clone)]
pub struct TimeBoxedStateStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    namespace: Namespace,
    horizon: chrono::Duration,
}

impl TimeBoxedStateStore {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        namespace: Namespace,
    ) -> Self {
        Self {
            storage,
            clock,
            namespace,
            horizon: chrono::Duration::seconds(STALENESS_HORIZON_SECS),
        }
    }

    pub fn with_horizon(mut self, horizon: chrono::Duration) -> Self {
        self.horizon = horizon;
        self
    }

    /// Same storage and clock, different key namespace.
    pub fn in_namespace(&self, namespace: Namespace) -> Self {
        Self {
            namespace,
            ..self.clone()
        }
    }

    pub fn horizon(&self) -> chrono::Duration {
        self.horizon
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load_record(key).map(|record| record.data)
    }

    /// Like `load` but keeps the write timestamp.
    pub fn load_record<T: DeserializeOwned>(&self, key: &str) -> Option<PersistedState<T>> {
        let storage_key = self.namespace.key(key);
        match self.try_load(&storage_key) {
            Ok(record) => record,
            Err(e) => {
                warn!("Error restoring {}: {}", storage_key, e);
                self.discard(&storage_key);
                None
            }
        }
    }

    /// Overwrite any prior record for `key` with `value` stamped now.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let storage_key = self.namespace.key(key);
        let record = PersistedState {
            data: value,
            timestamp: self.clock.now(),
        };

        let result = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(&storage_key.to_string(), &json));

        if let Err(e) = result {
            warn!("Error saving {}: {}", storage_key, e);
        }
    }

    pub fn remove(&self, key: &str) {
        self.discard(&self.namespace.key(key));
    }

    pub fn is_stale(&self, timestamp: DateTime<Utc>) -> bool {
        self.clock.now() - timestamp >= self.horizon
    }

    fn try_load<T: DeserializeOwned>(
        &self,
        storage_key: &StorageKey,
    ) -> Result<Option<PersistedState<T>>, StorageError> {
        let Some(json) = self.storage.get(&storage_key.to_string())? else {
            return Ok(None);
        };

        let record: PersistedState<T> = serde_json::from_str(&json)?;
        if self.is_stale(record.timestamp) {
            debug!("Discarding stale {} saved at {}", storage_key, record.timestamp);
            self.discard(storage_key);
            return Ok(None);
        }

        Ok(Some(record))
    }

    fn discard(&self, storage_key: &StorageKey) {
        if let Err(e) = self.storage.remove(&storage_key.to_string()) {
            warn!("Error removing {}: {}", storage_key, e);
        }
    }
}
