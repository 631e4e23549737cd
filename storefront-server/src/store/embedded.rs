//! Embedded redb medium
//!
//! One table, one key. The blob is the same JSON array the other media hold.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};

use super::{BlobMedium, StoreResult};

/// key = configured products key, value = JSON blob
const BLOBS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("blobs");

#[derive(Clone)]
pub struct RedbMedium {
    db: Arc<Database>,
    key: String,
}

impl std::fmt::Debug for RedbMedium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbMedium").field("key", &self.key).finish()
    }
}

impl RedbMedium {
    /// Open or create the database file
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Ok(Self {
            db: Arc::new(db),
            key: key.into(),
        })
    }
}

#[async_trait]
impl BlobMedium for RedbMedium {
    fn name(&self) -> &'static str {
        "redb"
    }

    async fn get(&self) -> StoreResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(BLOBS_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(table.get(self.key.as_str())?.map(|v| v.value().to_vec()))
    }

    async fn put(&self, blob: Vec<u8>) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(BLOBS_TABLE)?;
            table.insert(self.key.as_str(), blob.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}
