//! Product persistence
//!
//! The whole catalog is one JSON array stored as a single blob. Every read
//! loads the full array and every write replaces it.
//!
//! | Medium | Location of the blob |
//! |--------|----------------------|
//! | [`FileMedium`] | flat file |
//! | [`RedisMedium`] | one key in a Redis-compatible cache |
//! | [`RedbMedium`] | one key in an embedded redb table |
//! | [`MemoryMedium`] | process memory |
//!
//! # Concurrency
//!
//! There is no locking, versioning or compare-and-swap. [`ProductStore::append`]
//! is a read-modify-write, so two appends that interleave lose one record:
//! whichever `write_all` lands last wins.

mod cache;
mod embedded;
mod file;
mod memory;

pub use cache::RedisMedium;
pub use embedded::RedbMedium;
pub use file::FileMedium;
pub use memory::MemoryMedium;

use std::sync::Arc;

use async_trait::async_trait;
use shared::ProductRecord;
use thiserror::Error;

use crate::config::StoreBackend;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A place that holds one opaque blob
#[async_trait]
pub trait BlobMedium: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Current blob, `None` if nothing was ever written
    async fn get(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the blob with a single write
    async fn put(&self, blob: Vec<u8>) -> StoreResult<()>;
}

/// The product table: a JSON array of [`ProductRecord`] kept in a [`BlobMedium`]
#[derive(Clone)]
pub struct ProductStore {
    medium: Arc<dyn BlobMedium>,
}

impl std::fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductStore")
            .field("medium", &self.medium.name())
            .finish()
    }
}

impl ProductStore {
    pub fn new(medium: impl BlobMedium + 'static) -> Self {
        Self {
            medium: Arc::new(medium),
        }
    }

    pub fn from_arc(medium: Arc<dyn BlobMedium>) -> Self {
        Self { medium }
    }

    /// Open the medium selected by configuration
    pub fn open(backend: &StoreBackend, key: &str) -> StoreResult<Self> {
        let store = match backend {
            StoreBackend::File(path) => Self::new(FileMedium::new(path.clone())),
            StoreBackend::Redis(url) => Self::new(RedisMedium::new(url, key)?),
            StoreBackend::Redb(path) => Self::new(RedbMedium::open(path, key)?),
            StoreBackend::Memory => Self::new(MemoryMedium::default()),
        };
        tracing::info!(medium = store.medium.name(), "Product store ready");
        Ok(store)
    }

    /// Read the full record set, surfacing backend errors
    pub async fn try_read_all(&self) -> StoreResult<Vec<ProductRecord>> {
        match self.medium.get().await? {
            Some(blob) => Ok(serde_json::from_slice(&blob)?),
            None => {
                tracing::debug!(medium = self.medium.name(), "No product blob stored yet");
                Ok(Vec::new())
            }
        }
    }

    /// Read the full record set in insertion order.
    ///
    /// Never fails: an unreachable medium or an unreadable blob is logged and
    /// reported as an empty catalog.
    pub async fn read_all(&self) -> Vec<ProductRecord> {
        match self.try_read_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(
                    medium = self.medium.name(),
                    error = %e,
                    "Product read failed, treating catalog as empty"
                );
                Vec::new()
            }
        }
    }

    /// Replace the stored record set with `records`
    pub async fn write_all(&self, records: &[ProductRecord]) -> StoreResult<()> {
        let blob = serde_json::to_vec_pretty(records)?;
        self.medium.put(blob).await?;
        tracing::debug!(
            medium = self.medium.name(),
            count = records.len(),
            "Wrote product blob"
        );
        Ok(())
    }

    /// Append one record (read-modify-write, not transactional).
    ///
    /// Returns the number of records written.
    pub async fn append(&self, record: ProductRecord) -> StoreResult<usize> {
        let mut all = self.read_all().await;
        all.push(record);
        self.write_all(&all).await?;
        Ok(all.len())
    }
}
