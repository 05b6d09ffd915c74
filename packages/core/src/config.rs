//! Store configuration
//!
//! `StoreConfig` is built once at startup (from defaults, a deserialized
//! settings object, or environment variables) and handed to
//! `NodeStore::with_config`. It is immutable for the store's lifetime.

use crate::services::NodeStoreError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Upper bound for the broadcast channel; larger buffers only hide stuck receivers
const MAX_EVENT_CHANNEL_CAPACITY: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Populate a fresh store with the example tree (root folder, sample notes)
    pub seed_default_tree: bool,

    /// Capacity of the typed `StoreEvent` broadcast channel.
    ///
    /// 128 leaves headroom for bursts (bulk creation) while bounding memory.
    /// Receivers that lag further simply miss old events.
    pub event_channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_default_tree: true,
            event_channel_capacity: 128,
        }
    }
}

impl StoreConfig {
    /// Configuration for an empty store with default limits
    pub fn empty() -> Self {
        Self {
            seed_default_tree: false,
            ..Self::default()
        }
    }

    /// Read overrides from `KNOWBASE_SEED_DEFAULT_TREE` and
    /// `KNOWBASE_EVENT_CAPACITY`.
    ///
    /// Unset variables keep their defaults; unparseable ones are logged and
    /// ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            seed_default_tree: env_or("KNOWBASE_SEED_DEFAULT_TREE", defaults.seed_default_tree),
            event_channel_capacity: env_or(
                "KNOWBASE_EVENT_CAPACITY",
                defaults.event_channel_capacity,
            ),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), NodeStoreError> {
        if self.event_channel_capacity == 0 {
            return Err(NodeStoreError::invalid_config(
                "event_channel_capacity must be greater than 0",
            ));
        }

        if self.event_channel_capacity > MAX_EVENT_CHANNEL_CAPACITY {
            return Err(NodeStoreError::invalid_config(format!(
                "event_channel_capacity cannot exceed {}",
                MAX_EVENT_CHANNEL_CAPACITY
            )));
        }

        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparseable {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
