//! Configuration entries and the storage seam the HTTP layer talks to.
//!
//! Two implementations share one contract: [`SqliteConfigStore`] for real deployments
//! and [`MemoryConfigStore`] for tests. Names are not unique. Reads by name return the
//! oldest match; updates and deletes by name touch every match and are no-ops when
//! nothing matches.

mod memory;
mod sqlite;

pub use memory::MemoryConfigStore;
pub use sqlite::{SeedEntry, SqliteConfigStore, SEED_ENTRIES};

use crate::error::StoreError;
use crate::metadata::Metadata;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A persisted configuration entry. `created` is UTC and never leaves the server.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfigEntry {
    pub id: i64,
    pub name: String,
    pub metadata: Metadata,
    #[serde(skip)]
    pub created: NaiveDateTime,
}

/// Client-supplied part of an entry. `id` and `created` are always assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NewConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewConfig {
    pub fn new(name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Liveness probe. Never fails; any probe error reads as `false`.
    async fn is_connected(&self) -> bool;

    /// Append an entry and return its id.
    async fn insert(&self, config: &NewConfig) -> Result<i64, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<ConfigEntry, StoreError>;

    /// Oldest entry with this name.
    async fn get_by_name(&self, name: &str) -> Result<ConfigEntry, StoreError>;

    /// All entries, oldest first. Empty when there are none.
    async fn list(&self) -> Result<Vec<ConfigEntry>, StoreError>;

    /// Replace the metadata of every entry named `name`. Returns rows touched.
    async fn update_by_name(&self, name: &str, metadata: &Metadata) -> Result<u64, StoreError>;

    /// Remove every entry named `name`. Returns rows removed.
    async fn delete_by_name(&self, name: &str) -> Result<u64, StoreError>;
}
