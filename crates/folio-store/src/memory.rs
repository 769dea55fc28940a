use std::collections::HashMap;
use std::sync::RwLock;

use folio_crypto::ContentHasher;
use folio_types::ContentHash;

use crate::error::StoreResult;
use crate::traits::{BlobStore, WriteOutcome};

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs are held behind a `RwLock` and
/// cloned on read.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn read(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(hash).cloned())
    }

    fn write(&self, data: &[u8]) -> StoreResult<WriteOutcome> {
        let hash = ContentHasher::SNAPSHOT.hash(data);
        let mut map = self.blobs.write().expect("lock poisoned");
        let created = !map.contains_key(&hash);
        if created {
            map.insert(hash, data.to_vec());
        }
        Ok(WriteOutcome { hash, created })
    }

    fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(self.blobs.read().expect("lock poisoned").contains_key(hash))
    }

    fn delete(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(self.blobs.write().expect("lock poisoned").remove(hash).is_some())
    }

    fn list(&self) -> StoreResult<Vec<ContentHash>> {
        let mut hashes: Vec<ContentHash> = self
            .blobs
            .read()
            .expect("lock poisoned")
            .keys()
            .copied()
            .collect();
        hashes.sort();
        Ok(hashes)
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}
