//! Redis-compatible cache medium

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tokio::sync::OnceCell;

use super::{BlobMedium, StoreResult};

/// Per connection attempt
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Per command
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reconnect attempts after the first failure
const CONNECT_RETRIES: usize = 2;

/// Stores the blob under one well-known key.
///
/// The connection is opened on first use and reused for the lifetime of the
/// medium. A failed connect leaves the cell empty so the next call retries.
pub struct RedisMedium {
    client: redis::Client,
    key: String,
    conn: OnceCell<ConnectionManager>,
}

impl std::fmt::Debug for RedisMedium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisMedium")
            .field("key", &self.key)
            .field("connected", &self.conn.initialized())
            .finish()
    }
}

impl RedisMedium {
    /// Parse the URL; no connection is made until the first read or write
    pub fn new(url: &str, key: impl Into<String>) -> StoreResult<Self> {
        Ok(Self {
            client: redis::Client::open(url)?,
            key: key.into(),
            conn: OnceCell::new(),
        })
    }

    async fn connection(&self) -> StoreResult<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let config = ConnectionManagerConfig::new()
                    .set_connection_timeout(CONNECT_TIMEOUT)
                    .set_response_timeout(RESPONSE_TIMEOUT)
                    .set_number_of_retries(CONNECT_RETRIES);
                let conn = ConnectionManager::new_with_config(self.client.clone(), config).await?;
                tracing::info!(key = %self.key, "Connected to Redis");
                Ok::<_, redis::RedisError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl BlobMedium for RedisMedium {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        let blob: Option<Vec<u8>> = conn.get(&self.key).await?;
        if blob.is_none() {
            tracing::warn!(key = %self.key, "Redis has no products key");
        }
        Ok(blob)
    }

    async fn put(&self, blob: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set(&self.key, blob).await?;
        Ok(())
    }
}
