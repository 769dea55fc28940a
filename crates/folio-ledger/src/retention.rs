use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use folio_types::{ContentHash, Timestamp, VersionId};

use crate::error::LedgerResult;
use crate::store::VersionStore;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub versions_removed: Vec<VersionId>,
    pub blobs_removed: usize,
    /// Branches whose head was removed and now point at an older version.
    pub branches_repointed: Vec<String>,
    /// Branches whose head was removed and have no remaining version.
    pub branches_dropped: Vec<String>,
}

impl CleanupReport {
    pub fn removed(&self) -> usize {
        self.versions_removed.len()
    }
}

impl VersionStore {
    /// Remove untagged versions at or before `now - retention`.
    ///
    /// Tagged versions are kept regardless of age. A blob is deleted only
    /// when no remaining version references its hash.
    pub fn cleanup_old_versions(&mut self, retention: Duration) -> LedgerResult<CleanupReport> {
        let cutoff = Timestamp::cutoff_ms(retention);
        let expired: Vec<VersionId> = self
            .versions
            .values()
            .filter(|v| !v.is_tagged() && v.timestamp.millis <= cutoff)
            .map(|v| v.version_id.clone())
            .collect();

        let mut report = CleanupReport::default();
        if expired.is_empty() {
            debug!(cutoff, "nothing to clean up");
            return Ok(report);
        }

        let mut candidate_blobs: BTreeSet<ContentHash> = BTreeSet::new();
        for id in &expired {
            if let Some(v) = self.versions.remove(id) {
                candidate_blobs.insert(v.content_hash);
            }
        }
        let live: BTreeSet<ContentHash> = self.versions.values().map(|v| v.content_hash).collect();
        for hash in candidate_blobs.difference(&live) {
            if self.blobs.delete(hash)? {
                report.blobs_removed += 1;
            }
            self.cache.remove(hash);
        }

        let dangling = self
            .refs
            .branches_where(|head| !self.versions.contains_key(head));
        for branch in dangling {
            match self.newest_with_label(&branch).map(|v| v.version_id.clone()) {
                Some(id) => {
                    self.refs.point(&branch, id)?;
                    report.branches_repointed.push(branch);
                }
                None => {
                    self.refs.clear_pointer(&branch);
                    report.branches_dropped.push(branch);
                }
            }
        }

        report.versions_removed = expired;
        self.save_index()?;
        info!(
            versions = report.removed(),
            blobs = report.blobs_removed,
            repointed = report.branches_repointed.len(),
            dropped = report.branches_dropped.len(),
            "cleaned up old versions"
        );
        Ok(report)
    }

    /// Cleanup with the configured retention period.
    pub fn cleanup_expired(&mut self) -> LedgerResult<CleanupReport> {
        let retention = self.config.retention();
        self.cleanup_old_versions(retention)
    }
}
