//! In-process store with the same observable behaviour as the SQLite engine.

use super::{ConfigEntry, ConfigStore, NewConfig};
use crate::error::StoreError;
use crate::metadata::Metadata;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Table {
    /// Insertion order, which is also creation order.
    rows: Vec<ConfigEntry>,
    last_id: i64,
    last_created: Option<NaiveDateTime>,
}

#[derive(Clone, Debug)]
pub struct MemoryConfigStore {
    table: Arc<RwLock<Table>>,
    connected: Arc<AtomicBool>,
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::default())),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flip the result of [`ConfigStore::is_connected`].
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>, StoreError> {
        self.table
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>, StoreError> {
        self.table
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.table.is_poisoned()
    }

    async fn insert(&self, config: &NewConfig) -> Result<i64, StoreError> {
        let mut table = self.write()?;
        table.last_id += 1;
        let id = table.last_id;
        // Never earlier than the previous insert, even if the wall clock steps back.
        let now = Utc::now().naive_utc();
        let created = table.last_created.map_or(now, |last| last.max(now));
        table.last_created = Some(created);
        table.rows.push(ConfigEntry {
            id,
            name: config.name.clone(),
            metadata: config.metadata.clone(),
            created,
        });
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<ConfigEntry, StoreError> {
        self.read()?
            .rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_name(&self, name: &str) -> Result<ConfigEntry, StoreError> {
        self.read()?
            .rows
            .iter()
            .find(|row| row.name == name)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>, StoreError> {
        let mut rows = self.read()?.rows.clone();
        // Stable sort keeps insertion order for equal timestamps.
        rows.sort_by_key(|row| row.created);
        Ok(rows)
    }

    async fn update_by_name(&self, name: &str, metadata: &Metadata) -> Result<u64, StoreError> {
        let mut table = self.write()?;
        let mut touched = 0;
        for row in table.rows.iter_mut().filter(|row| row.name == name) {
            row.metadata = metadata.clone();
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, StoreError> {
        let mut table = self.write()?;
        let before = table.rows.len();
        table.rows.retain(|row| row.name != name);
        Ok((before - table.rows.len()) as u64)
    }
}
