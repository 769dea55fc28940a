use serde::Serialize;
use tracing::{info, warn};

use folio_doc::{Change, ChangeKind};
use folio_merge::{detect_conflicts, resolve, MergeConflict, MergeStrategy};
use folio_types::Timestamp;

use crate::error::LedgerResult;
use crate::store::VersionStore;
use crate::version::Version;

/// Result of [`VersionStore::merge`].
///
/// Conflicts are a normal outcome, not an error: `success` is false and
/// `conflicts` lists what blocked the merge so the caller can retry with an
/// explicit strategy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub success: bool,
    pub merged_version: Option<Version>,
    pub conflicts: Vec<MergeConflict>,
    pub message: String,
}

impl MergeOutcome {
    fn failed(message: String, conflicts: Vec<MergeConflict>) -> Self {
        Self {
            success: false,
            merged_version: None,
            conflicts,
            message,
        }
    }
}

impl VersionStore {
    /// Merge the head of `source` into `target` (default: current branch).
    ///
    /// The chosen side's snapshot is committed whole onto `target` with
    /// `parent = target head`, and `target` becomes current. Under
    /// [`MergeStrategy::Auto`] any detected conflict aborts with no commit.
    pub fn merge(
        &mut self,
        source: &str,
        target: Option<&str>,
        strategy: MergeStrategy,
    ) -> LedgerResult<MergeOutcome> {
        let target = target.unwrap_or_else(|| self.refs.current()).to_string();

        let (Some(source_id), Some(target_id)) = (self.branch_head(source), self.branch_head(&target))
        else {
            let missing = if self.branch_head(source).is_none() { source } else { target.as_str() };
            return Ok(MergeOutcome::failed(format!("Branch not found: {missing}"), vec![]));
        };
        let (Some(source_snap), Some(target_snap)) =
            (self.snapshot_at(&source_id)?, self.snapshot_at(&target_id)?)
        else {
            return Ok(MergeOutcome::failed("Branch head not found".into(), vec![]));
        };

        let conflicts = detect_conflicts(&source_snap, &target_snap);
        let merged = match resolve(strategy, &source_snap, &target_snap, conflicts.clone()) {
            Ok(snapshot) => snapshot,
            Err(conflicts) => {
                warn!(source, target = %target, conflicts = conflicts.len(), "merge blocked by conflicts");
                return Ok(MergeOutcome::failed(
                    format!("Merge conflicts detected: {}", conflicts.len()),
                    conflicts,
                ));
            }
        };

        let description = format!("Merged {source} into {target}");
        let change = Change::new(ChangeKind::Structure, "/", Timestamp::now())
            .with_description(description.clone());
        let version = self.commit_on(
            &target,
            Some(target_id),
            &merged,
            &format!("Merge {source} into {target}"),
            None,
            vec![change],
        )?;
        info!(source, target = %target, %strategy, version = %version.version_id, "merged branches");
        Ok(MergeOutcome {
            success: true,
            merged_version: Some(version),
            conflicts,
            message: description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_doc::{Block, Snapshot};

    fn doc(texts: &[&str]) -> Snapshot {
        Snapshot::with_blocks(texts.iter().map(|t| Block::paragraph(t)).collect())
    }

    fn diverged() -> VersionStore {
        let mut store = VersionStore::in_memory();
        store.commit(&doc(&["base"]), "init", None, vec![]).unwrap();
        store.create_branch("draft", None).unwrap();
        store.commit(&doc(&["base", "extra"]), "grow", None, vec![]).unwrap();
        store.switch_branch("main").unwrap();
        store
    }

    #[test]
    fn auto_with_conflicts_commits_nothing() {
        let mut store = diverged();
        let before = store.len();
        let outcome = store.merge("draft", None, MergeStrategy::Auto).unwrap();
        assert!(!outcome.success);
        assert!(outcome.merged_version.is_none());
        assert_eq!(
            outcome.conflicts,
            vec![MergeConflict::BlockCountMismatch { source: 2, target: 1 }]
        );
        assert_eq!(store.len(), before);
    }

    #[test]
    fn theirs_commits_source_snapshot_onto_target() {
        let mut store = diverged();
        let main_head = store.get_head_version().cloned();
        let outcome = store.merge("draft", Some("main"), MergeStrategy::Theirs).unwrap();
        assert!(outcome.success);
        let merged = outcome.merged_version.unwrap();
        assert_eq!(merged.branch, "main");
        assert_eq!(merged.parent_version, main_head);
        assert_eq!(merged.message, "Merge draft into main");
        assert_eq!(merged.changes[0].kind, ChangeKind::Structure);
        assert_eq!(store.get_head_version(), Some(&merged.version_id));

        let snap = store.snapshot_at(&merged.version_id).unwrap().unwrap();
        assert_eq!(snap.block_texts(), vec!["base".to_string(), "extra".to_string()]);
    }

    #[test]
    fn ours_keeps_target_snapshot() {
        let mut store = diverged();
        let outcome = store.merge("draft", None, MergeStrategy::Ours).unwrap();
        let merged = outcome.merged_version.unwrap();
        let snap = store.snapshot_at(&merged.version_id).unwrap().unwrap();
        assert_eq!(snap.block_texts(), vec!["base".to_string()]);
    }

    #[test]
    fn unknown_branch_is_reported() {
        let mut store = diverged();
        let outcome = store.merge("ghost", None, MergeStrategy::Theirs).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Branch not found: ghost");
    }
}
