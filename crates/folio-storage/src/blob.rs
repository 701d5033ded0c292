//! Media bucket on the local filesystem

use async_trait::async_trait;
use folio_core::MediaStore;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::{Result, StorageError};

/// Blob store for uploaded portfolio media.
///
/// Files live at `{root}/{bucket}/{path}` and are served back under
/// `{public_url}/media/{bucket}/{path}`.
pub struct BlobStore {
    root: PathBuf,
    bucket: String,
    public_url: String,
}

impl BlobStore {
    pub fn new(root: PathBuf, bucket: &str, public_url: &str) -> Result<Self> {
        let store = Self {
            root,
            bucket: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        };
        std::fs::create_dir_all(store.bucket_dir())?;
        Ok(store)
    }

    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    /// Store bytes at a bucket-relative path, replacing any previous blob
    pub async fn store(&self, path: &str, content: &[u8]) -> Result<PathBuf> {
        let full = self.path_for(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, content).await?;
        debug!("Stored {} bytes at {}", content.len(), full.display());
        Ok(full)
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/media/{}/{}", self.public_url, self.bucket, path)
    }

    /// Resolve a bucket-relative path, refusing anything that could escape the bucket
    fn path_for(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.bucket_dir().join(relative))
    }
}

#[async_trait]
impl MediaStore for BlobStore {
    async fn upload(&self, path: &str, bytes: &[u8]) -> folio_core::Result<()> {
        self.store(path, bytes).await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.url_for(path)
    }
}
