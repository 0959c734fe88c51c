//! Redb-backed key/value persistence shared by every command handler.
//!
//! The store is a single logical map from string key to a serialized
//! value. Each value type ("storer") owns exactly one key through
//! [`Storer::INDEX`], so every call site for that type agrees on where it
//! lives.
//!
//! # Schema
//!
//! ```text
//! STORERS: key -> value (serde_json)
//! ```
//!
//! # Concurrency
//!
//! Individual [`Store::get`] and [`Store::set`] calls are atomic: redb
//! serializes write transactions and readers only observe committed
//! snapshots. Sequences that read, modify and write back must hold the
//! process-wide gate returned by [`Store::lock`] for their whole duration,
//! otherwise concurrent handlers can lose updates.

use parking_lot::RwLock;
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableDatabase, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Redb table holding every storer.
const STORERS: TableDefinition<&str, &[u8]> = TableDefinition::new("storers");

/// Errors from store access.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key has never been set. Handlers usually treat this as
    /// "start from an empty value".
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("store is closed")]
    Closed,

    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether this is the expected "key absent" condition.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Static label for metrics.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Closed => "closed",
            Self::Database(_) => "database",
            Self::Transaction(_) => "transaction",
            Self::Table(_) => "table",
            Self::Storage(_) => "storage",
            Self::Commit(_) => "commit",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// A value type that owns a fixed store key.
pub trait Storer: Serialize + DeserializeOwned + Send + Sync {
    /// Key under which every value of this type is stored.
    const INDEX: &'static str;

    fn index(&self) -> &'static str {
        Self::INDEX
    }
}

/// Backing medium, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// Single durable file (production).
    Durable(PathBuf),
    /// Ephemeral in-memory database (tests and development).
    Memory,
}

impl StoreMode {
    /// Path marker selecting the in-memory mode.
    pub const MEMORY_MARKER: &'static str = ":memory:";

    pub fn from_path(path: &str) -> Self {
        if path == Self::MEMORY_MARKER {
            Self::Memory
        } else {
            Self::Durable(PathBuf::from(path))
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(Self::MEMORY_MARKER),
        }
    }
}

/// Guard for the process-wide read-modify-write gate. Dropping it unlocks.
pub type StoreGuard<'a> = MutexGuard<'a, ()>;

struct StoreInner {
    db: RwLock<Option<Database>>,
    gate: Mutex<()>,
    mode: StoreMode,
}

/// Handle to the opened store. Cheap to clone; all clones share one database.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Open the store in the given mode, creating the table if needed.
    pub fn open(mode: StoreMode) -> Result<Self, StoreError> {
        let db = match &mode {
            StoreMode::Durable(path) => Database::create(path)?,
            StoreMode::Memory => Database::builder().create_with_backend(InMemoryBackend::new())?,
        };

        // Ensure the table exists so readers never see TableDoesNotExist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STORERS)?;
        }
        write_txn.commit()?;

        info!(mode = %mode, "Store opened");
        Ok(Self {
            inner: Arc::new(StoreInner {
                db: RwLock::new(Some(db)),
                gate: Mutex::new(()),
                mode,
            }),
        })
    }

    /// Open an in-memory store.
    pub fn memory() -> Result<Self, StoreError> {
        Self::open(StoreMode::Memory)
    }

    /// Open a durable store at `path`.
    pub fn durable(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(StoreMode::Durable(path.as_ref().to_path_buf()))
    }

    pub fn mode(&self) -> &StoreMode {
        &self.inner.mode
    }

    /// Close the store. Every later access fails with [`StoreError::Closed`].
    pub fn close(&self) -> Result<(), StoreError> {
        let db = self.inner.db.write().take().ok_or(StoreError::Closed)?;
        drop(db);
        info!(mode = %self.inner.mode, "Store closed");
        Ok(())
    }

    /// Read and decode the value at `key`.
    ///
    /// Fails with [`StoreError::NotFound`] when the key has never been set.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let result = self.read(key);
        crate::metrics::record_store_op("get", result_label(&result));
        result
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let guard = self.inner.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(STORERS)?;
        let Some(raw) = table.get(key)? else {
            return Err(StoreError::NotFound(key.to_string()));
        };
        let value = serde_json::from_slice(raw.value())?;
        Ok(value)
    }

    /// Replace the value at `key`.
    ///
    /// Returns whether a previous value existed and the number of bytes
    /// written. The write is a single committed transaction, so readers see
    /// either the old or the new value.
    pub fn set<T: Serialize + ?Sized>(&self, value: &T, key: &str) -> Result<(bool, usize), StoreError> {
        let result = self.write(value, key);
        crate::metrics::record_store_op("set", result_label(&result));
        result
    }

    fn write<T: Serialize + ?Sized>(&self, value: &T, key: &str) -> Result<(bool, usize), StoreError> {
        let encoded = serde_json::to_vec(value)?;

        let guard = self.inner.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let write_txn = db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(STORERS)?;
            table.insert(key, encoded.as_slice())?.is_some()
        };
        write_txn.commit()?;

        debug!(key, bytes = encoded.len(), existed, "Stored value");
        Ok((existed, encoded.len()))
    }

    /// Load a storer from its own key.
    pub fn load<T: Storer>(&self) -> Result<T, StoreError> {
        self.get(T::INDEX)
    }

    /// Load a storer, starting from `T::default()` when it was never saved.
    pub fn load_or_default<T: Storer + Default>(&self) -> Result<T, StoreError> {
        match self.load() {
            Err(StoreError::NotFound(_)) => Ok(T::default()),
            other => other,
        }
    }

    /// Save a storer under its own key.
    pub fn save<T: Storer>(&self, value: &T) -> Result<(bool, usize), StoreError> {
        self.set(value, value.index())
    }

    /// Acquire the process-wide read-modify-write gate.
    ///
    /// Hold the guard across every get/modify/set sequence on shared keys.
    pub async fn lock(&self) -> StoreGuard<'_> {
        self.inner.gate.lock().await
    }
}

fn result_label<T>(result: &Result<T, StoreError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.error_code(),
    }
}
