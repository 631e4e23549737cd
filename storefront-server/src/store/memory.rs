//! In-process medium

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BlobMedium, StoreResult};

/// Keeps the blob in memory; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryMedium {
    blob: RwLock<Option<Vec<u8>>>,
}

#[async_trait]
impl BlobMedium for MemoryMedium {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.blob.read().await.clone())
    }

    async fn put(&self, blob: Vec<u8>) -> StoreResult<()> {
        *self.blob.write().await = Some(blob);
        Ok(())
    }
}
