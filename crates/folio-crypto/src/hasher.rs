use folio_types::{ContentHash, Timestamp, VersionId};

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"folio-snapshot-v1"`) that is
/// prepended to every hash computation, so equal bytes hashed for different
/// purposes produce different digests.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for serialized snapshot blobs.
    pub const SNAPSHOT: Self = Self {
        domain: "folio-snapshot-v1",
    };
    /// Hasher for version identifiers.
    pub const VERSION: Self = Self {
        domain: "folio-version-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    fn digest(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        ContentHash::from_digest(self.digest(data))
    }

    /// Verify that data produces the expected hash.
    pub fn verify(&self, data: &[u8], expected: &ContentHash) -> bool {
        self.hash(data) == *expected
    }

    /// Derive a version identifier from `(timestamp, message, content_hash)`.
    pub fn version_id(
        &self,
        timestamp: &Timestamp,
        message: &str,
        content_hash: &ContentHash,
    ) -> VersionId {
        let material = format!("{timestamp}\u{0}{message}\u{0}{content_hash}");
        VersionId::from_digest(&self.digest(material.as_bytes()))
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
