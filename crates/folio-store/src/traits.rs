use folio_types::ContentHash;

use crate::error::StoreResult;

/// Result of a blob write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOutcome {
    pub hash: ContentHash,
    /// False when a blob with this hash already existed and nothing was written.
    pub created: bool,
}

/// Content-addressed blob store.
///
/// Implementations must satisfy:
/// - Blobs are immutable once written; the same bytes always produce the
///   same hash.
/// - Writing existing content is an idempotent no-op reported as
///   `created == false`.
/// - All I/O errors are propagated.
pub trait BlobStore: Send + Sync {
    /// Read a blob by hash.
    ///
    /// Returns `Ok(None)` if it does not exist and `Err` on I/O failure or
    /// hash mismatch.
    fn read(&self, hash: &ContentHash) -> StoreResult<Option<Vec<u8>>>;

    /// Write a blob and return its hash.
    fn write(&self, data: &[u8]) -> StoreResult<WriteOutcome>;

    fn exists(&self, hash: &ContentHash) -> StoreResult<bool>;

    /// Delete a blob. Returns `true` if it existed.
    ///
    /// For retention cleanup only; deleting a referenced blob loses data.
    fn delete(&self, hash: &ContentHash) -> StoreResult<bool>;

    /// Hashes of every stored blob, sorted.
    fn list(&self) -> StoreResult<Vec<ContentHash>>;
}
