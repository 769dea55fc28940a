use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use folio_doc::Change;
use folio_types::{ContentHash, Timestamp, VersionId};

/// One commit of a snapshot.
///
/// Immutable once created except for `tags`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub version_id: VersionId,
    pub parent_version: Option<VersionId>,
    pub timestamp: Timestamp,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub changes: Vec<Change>,
    pub content_hash: ContentHash,
    pub branch: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Version {
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// One-line summary: `<id> <message>`.
    pub fn oneline(&self) -> String {
        format!("{} {}", self.version_id, self.message)
    }
}
