use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use folio_crypto::ContentHasher;
use folio_types::ContentHash;

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, WriteOutcome};

const BLOB_DIR: &str = "blobs";
const BLOB_EXT: &str = "blob";

/// Filesystem blob store: `<root>/blobs/<hex>.blob`, one file per blob.
#[derive(Debug)]
pub struct FsBlobStore {
    dir: PathBuf,
    verify: bool,
}

impl FsBlobStore {
    /// Open (creating if needed) the blob directory under `root`.
    pub fn open(root: &Path, verify: bool) -> StoreResult<Self> {
        let dir = root.join(BLOB_DIR);
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, verify })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, hash: &ContentHash) -> PathBuf {
        self.dir.join(format!("{}.{BLOB_EXT}", hash.to_hex()))
    }
}

/// Write `data` to `path` via a temp file in the same directory, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl BlobStore for FsBlobStore {
    fn read(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>> {
        let data = match std::fs::read(self.path_for(hash)) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if self.verify && !ContentHasher::SNAPSHOT.verify(&data, hash) {
            let computed = ContentHasher::SNAPSHOT.hash(&data);
            warn!(expected = %hash, computed = %computed, "blob hash mismatch");
            return Err(StoreError::HashMismatch {
                expected: *hash,
                computed,
            });
        }
        Ok(Some(data))
    }

    fn write(&self, data: &[u8]) -> StoreResult<WriteOutcome> {
        let hash = ContentHasher::SNAPSHOT.hash(data);
        let path = self.path_for(&hash);
        if path.exists() {
            debug!(hash = %hash.short_hex(), "blob already stored");
            return Ok(WriteOutcome {
                hash,
                created: false,
            });
        }
        write_atomic(&path, data)?;
        debug!(hash = %hash.short_hex(), len = data.len(), "blob written");
        Ok(WriteOutcome {
            hash,
            created: true,
        })
    }

    fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(self.path_for(hash).exists())
    }

    fn delete(&self, hash: &ContentHash) -> StoreResult<bool> {
        match std::fs::remove_file(self.path_for(hash)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> StoreResult<Vec<ContentHash>> {
        let mut hashes = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == BLOB_EXT).unwrap_or(false) {
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
                match ContentHash::from_hex(stem) {
                    Ok(hash) => hashes.push(hash),
                    Err(e) => warn!("skipping stray blob file {:?}: {}", path, e),
                }
            }
        }
        hashes.sort();
        Ok(hashes)
    }
}
