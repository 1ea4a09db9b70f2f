// [libs/core/blob-store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CONTENT-ADDRESSED BLOB STORE (ESTRATO L0)
 * RESPONSABILIDAD: ALMACENAMIENTO DEDUPLICADO POR HASH SHA-256
 *
 * Bytes are stored under `<root>/<hash[0..2]>/<hash[2..4]>/<hash>`,
 * the conventional two-level shard used to keep any single directory
 * from accumulating too many entries. A sidecar `<hash>.refcount`
 * file tracks how many document versions reference the blob; `unref`
 * deletes the blob once the count reaches zero. All mutation on a
 * given hash is serialized through an in-process lock table so two
 * concurrent uploads of identical bytes race safely onto one entry.
 * =================================================================
 */

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("io error on blob store: {0}")]
    Io(#[from] std::io::Error),
    #[error("blob {0} not found")]
    NotFound(String),
    #[error("hash collision detected for {0}: stored content differs from incoming bytes")]
    HashCollision(String),
}

/// Lowercase hex SHA-256 digest of a blob's bytes.
pub type BlobHash = String;

pub fn hash_bytes(bytes: &[u8]) -> BlobHash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Filesystem-backed content-addressed store. Clone is cheap (Arc-wrapped lock table).
#[derive(Clone)]
pub struct BlobStore {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<BlobHash, Arc<Mutex<()>>>>>,
}

impl BlobStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BlobStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    fn shard_path(&self, hash: &str) -> PathBuf {
        self.root.join(&hash[0..2]).join(&hash[2..4])
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        self.shard_path(hash).join(hash)
    }

    fn refcount_path(&self, hash: &str) -> PathBuf {
        self.shard_path(hash).join(format!("{hash}.refcount"))
    }

    async fn hash_lock(&self, hash: &str) -> Arc<Mutex<()>> {
        let mut table = self.locks.lock().await;
        table
            .entry(hash.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Stores `bytes`, returning its hash. Identical bytes uploaded twice
    /// map onto the same physical entry; the reference count is not bumped
    /// here, callers own reference accounting via [`BlobStore::inc_ref`].
    #[instrument(skip(self, bytes))]
    pub async fn put(&self, bytes: &[u8]) -> Result<BlobHash, BlobStoreError> {
        let hash = hash_bytes(bytes);
        let lock = self.hash_lock(&hash).await;
        let _guard = lock.lock().await;

        let path = self.blob_path(&hash);
        if path.exists() {
            let existing = fs::read(&path).await?;
            if existing != bytes {
                warn!(%hash, "blob hash collision detected");
                return Err(BlobStoreError::HashCollision(hash));
            }
            debug!(%hash, "blob already present, dedup hit");
            return Ok(hash);
        }

        fs::create_dir_all(self.shard_path(&hash)).await?;
        fs::write(&path, bytes).await?;
        debug!(%hash, size = bytes.len(), "blob written");
        Ok(hash)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, hash: &str) -> Result<Vec<u8>, BlobStoreError> {
        let path = self.blob_path(hash);
        fs::read(&path)
            .await
            .map_err(|_| BlobStoreError::NotFound(hash.to_string()))
    }

    /// Increments the reference count for `hash`, creating it at 1 if absent.
    #[instrument(skip(self))]
    pub async fn inc_ref(&self, hash: &str) -> Result<u64, BlobStoreError> {
        let lock = self.hash_lock(hash).await;
        let _guard = lock.lock().await;
        let count = self.read_refcount(hash).await? + 1;
        self.write_refcount(hash, count).await?;
        Ok(count)
    }

    /// Decrements the reference count for `hash`; deletes the blob once it
    /// reaches zero. Returns the post-decrement count (0 means deleted).
    #[instrument(skip(self))]
    pub async fn dec_ref(&self, hash: &str) -> Result<u64, BlobStoreError> {
        let lock = self.hash_lock(hash).await;
        let _guard = lock.lock().await;
        let count = self.read_refcount(hash).await?.saturating_sub(1);
        if count == 0 {
            let _ = fs::remove_file(self.blob_path(hash)).await;
            let _ = fs::remove_file(self.refcount_path(hash)).await;
        } else {
            self.write_refcount(hash, count).await?;
        }
        Ok(count)
    }

    async fn read_refcount(&self, hash: &str) -> Result<u64, BlobStoreError> {
        match fs::read_to_string(self.refcount_path(hash)).await {
            Ok(s) => Ok(s.trim().parse().unwrap_or(0)),
            Err(_) => Ok(0),
        }
    }

    async fn write_refcount(&self, hash: &str, count: u64) -> Result<(), BlobStoreError> {
        fs::create_dir_all(self.shard_path(hash)).await?;
        fs::write(self.refcount_path(hash), count.to_string()).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dedup_identical_bytes_one_physical_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        let h1 = store.put(b"hello world").await.unwrap();
        let h2 = store.put(b"hello world").await.unwrap();
        assert_eq!(h1, h2);

        store.inc_ref(&h1).await.unwrap();
        store.inc_ref(&h1).await.unwrap();
        assert_eq!(store.get(&h1).await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn unref_to_zero_deletes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        let hash = store.put(b"ephemeral").await.unwrap();
        store.inc_ref(&hash).await.unwrap();
        let remaining = store.dec_ref(&hash).await.unwrap();
        assert_eq!(remaining, 0);
        assert!(store.get(&hash).await.is_err());
    }

    #[tokio::test]
    async fn different_bytes_yield_different_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();
        let h1 = store.put(b"alpha").await.unwrap();
        let h2 = store.put(b"beta").await.unwrap();
        assert_ne!(h1, h2);
    }
}
