use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use folio_doc::Snapshot;

use crate::conflict::MergeConflict;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Refuse on any conflict; otherwise keep the target.
    #[default]
    Auto,
    /// Keep the target branch's snapshot.
    Ours,
    /// Take the source branch's snapshot.
    Theirs,
}

/// Pick the snapshot to commit, or hand the conflicts back under `Auto`.
pub fn resolve(
    strategy: MergeStrategy,
    source: &Snapshot,
    target: &Snapshot,
    conflicts: Vec<MergeConflict>,
) -> Result<Snapshot, Vec<MergeConflict>> {
    debug!(%strategy, conflicts = conflicts.len(), "resolving merge");
    match strategy {
        MergeStrategy::Auto if !conflicts.is_empty() => Err(conflicts),
        MergeStrategy::Auto | MergeStrategy::Ours => Ok(target.clone()),
        MergeStrategy::Theirs => Ok(source.clone()),
    }
}
