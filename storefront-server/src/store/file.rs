//! Flat-file medium

use std::path::PathBuf;

use async_trait::async_trait;

use super::{BlobMedium, StoreResult};

/// Stores the blob as a single file, creating parent directories on write
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BlobMedium for FileMedium {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get(&self) -> StoreResult<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, blob: Vec<u8>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, blob).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProductStore;
    use rust_decimal::Decimal;
    use shared::ProductRecord;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let medium = FileMedium::new(dir.path().join("products.json"));
        assert!(medium.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/products.json");
        let medium = FileMedium::new(&path);
        medium.put(b"[]".to_vec()).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProductStore::new(FileMedium::new(dir.path().join("products.json")));
        let records = vec![
            ProductRecord::new("Tee", Decimal::new(195, 1), "f/tee", "https://x/tee", vec![]),
            ProductRecord::new(
                "Cap",
                Decimal::ZERO,
                "f/cap",
                "https://x/cap",
                vec!["https://x/cap-red".into(), "https://x/cap-blue".into()],
            ),
        ];

        store.write_all(&records).await.unwrap();
        let read = store.read_all().await;
        assert_eq!(read, records);

        store.write_all(&read).await.unwrap();
        assert_eq!(store.read_all().await, records);
    }
}
