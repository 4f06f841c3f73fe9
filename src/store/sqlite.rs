//! SQLite-backed store. Schema creation and seeding run once, when the database file is
//! first created; an existing file is used as-is.

use super::{ConfigEntry, ConfigStore, NewConfig};
use crate::error::StoreError;
use crate::metadata::{self, Metadata, RawMetadata};
use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, TypeInfo, ValueRef};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE configs (
        id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(255) NOT NULL,
        metadata TEXT NOT NULL,
        created_at DATETIME NOT NULL
    )
    "#,
    "CREATE INDEX idx_configs_created ON configs(created_at)",
];

const INSERT_SEED: &str =
    "INSERT INTO configs (name, metadata, created_at) VALUES (?1, ?2, strftime('%Y-%m-%d %H:%M:%f', 'now', ?3))";

const SELECT_COLUMNS: &str = "SELECT id, name, metadata, created_at FROM configs";

/// Example entry written when a database file is created.
#[derive(Clone, Copy, Debug)]
pub struct SeedEntry {
    pub name: &'static str,
    /// Metadata column text, stored verbatim.
    pub metadata: &'static str,
    /// How far `created_at` is backdated.
    pub age_days: u32,
}

/// Seeded in this order.
pub const SEED_ENTRIES: &[SeedEntry] = &[
    SeedEntry {
        name: "datacenter-1",
        metadata: r#"{"monitoring":{"enabled":"true"},"limits":{"cpu":{"enabled":"false","value":"300m"}}}"#,
        age_days: 60,
    },
    SeedEntry {
        name: "datacenter-2",
        metadata: r#"{"monitoring":{"enabled":"true"},"limits":{"cpu":{"enabled":"true","value":"250m"}}}"#,
        age_days: 14,
    },
];

#[derive(Clone, Debug)]
pub struct SqliteConfigStore {
    pool: SqlitePool,
}

impl SqliteConfigStore {
    /// Open the database file at `path`, creating and seeding it when it does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let fresh = !path.exists();

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Concurrent writers wait on SQLite's lock instead of failing with "database is locked".
            .busy_timeout(Duration::from_secs(5));
        match connect(options, path, fresh).await {
            Ok(pool) => Ok(Self { pool }),
            Err(err) => {
                if fresh {
                    discard_database_files(path);
                }
                Err(err)
            }
        }
    }

    /// Private in-memory database with the schema and no rows.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::memory(false).await
    }

    /// Private in-memory database with the schema and the seed entries.
    pub async fn in_memory_seeded() -> Result<Self, StoreError> {
        Self::memory(true).await
    }

    async fn memory(seed: bool) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // Every connection to ":memory:" is its own database, so pin exactly one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        initialize(&pool, seed).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Pool for a file database, initialized when `fresh`. The pool is closed on failure.
async fn connect(options: SqliteConnectOptions, path: &Path, fresh: bool) -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    let ready = async {
        sqlx::query("SELECT 1").execute(&pool).await?;
        if fresh {
            tracing::info!(path = %path.display(), "creating configuration database");
            initialize(&pool, true).await?;
        }
        Ok::<_, StoreError>(())
    }
    .await;

    match ready {
        Ok(()) => Ok(pool),
        Err(err) => {
            pool.close().await;
            Err(err)
        }
    }
}

/// Schema and optional seed rows in one transaction: both persist or neither does.
async fn initialize(pool: &SqlitePool, seed: bool) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    if seed {
        for entry in SEED_ENTRIES {
            sqlx::query(INSERT_SEED)
                .bind(entry.name)
                .bind(entry.metadata)
                .bind(format!("-{} days", entry.age_days))
                .execute(&mut *tx)
                .await?;
        }
    }
    tx.commit().await?;
    Ok(())
}

/// A file created by a failed first start would otherwise be taken as initialized next time.
fn discard_database_files(path: &Path) {
    let base = path.as_os_str().to_owned();
    for suffix in ["", "-wal", "-shm"] {
        let mut file = base.clone();
        file.push(suffix);
        if let Err(err) = std::fs::remove_file(&file) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(file = ?file, error = %err, "could not remove database file");
            }
        }
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<ConfigEntry, StoreError> {
    let raw = row.try_get_raw("metadata")?;
    let storage_class = if raw.is_null() {
        None
    } else {
        Some(raw.type_info().name().to_string())
    };

    let metadata = match storage_class.as_deref() {
        None => metadata::decode(None)?,
        Some("TEXT") => {
            let text: String = row.try_get("metadata")?;
            metadata::decode(Some(RawMetadata::Text(&text)))?
        }
        Some("BLOB") => {
            let bytes: Vec<u8> = row.try_get("metadata")?;
            metadata::decode(Some(RawMetadata::Bytes(&bytes)))?
        }
        Some(other) => metadata::decode(Some(RawMetadata::Other(other)))?,
    };

    Ok(ConfigEntry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        metadata,
        created: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ConfigStore for SqliteConfigStore {
    async fn is_connected(&self) -> bool {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await.is_ok()
    }

    async fn insert(&self, config: &NewConfig) -> Result<i64, StoreError> {
        let metadata = metadata::encode(&config.metadata)?;
        let result = sqlx::query(
            "INSERT INTO configs (name, metadata, created_at) VALUES (?1, ?2, strftime('%Y-%m-%d %H:%M:%f', 'now'))",
        )
        .bind(&config.name)
        .bind(metadata)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_by_id(&self, id: i64) -> Result<ConfigEntry, StoreError> {
        let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        entry_from_row(&row)
    }

    async fn get_by_name(&self, name: &str) -> Result<ConfigEntry, StoreError> {
        let row = sqlx::query(&format!("{} WHERE name = ?1 ORDER BY id ASC LIMIT 1", SELECT_COLUMNS))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        entry_from_row(&row)
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>, StoreError> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at ASC, id ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(entry_from_row).collect()
    }

    async fn update_by_name(&self, name: &str, metadata: &Metadata) -> Result<u64, StoreError> {
        let metadata = metadata::encode(metadata)?;
        let result = sqlx::query("UPDATE configs SET metadata = ?1 WHERE name = ?2")
            .bind(metadata)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM configs WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn single_connection_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap()
    }

    async fn table_exists(pool: &SqlitePool, name: &str) -> bool {
        sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(name)
            .fetch_optional(pool)
            .await
            .unwrap()
            .is_some()
    }

    #[tokio::test]
    async fn failed_initialization_leaves_nothing_behind() {
        let pool = single_connection_pool().await;
        sqlx::query("CREATE TABLE other (created_at DATETIME)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE INDEX idx_configs_created ON other(created_at)")
            .execute(&pool)
            .await
            .unwrap();

        assert!(initialize(&pool, true).await.is_err());
        assert!(!table_exists(&pool, "configs").await);
        assert!(table_exists(&pool, "other").await);
    }

    #[tokio::test]
    async fn initialization_creates_schema_and_seeds() {
        let pool = single_connection_pool().await;
        initialize(&pool, true).await.unwrap();

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM configs ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(names, ["datacenter-1", "datacenter-2"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_connect_on_fresh_path_is_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        std::os::unix::fs::symlink(dir.path().join("missing").join("state.db"), &path).unwrap();

        assert!(SqliteConfigStore::open(&path).await.is_err());
        assert!(std::fs::symlink_metadata(&path).is_err());
    }
}
