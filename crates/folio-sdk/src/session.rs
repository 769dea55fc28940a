use regex::RegexBuilder;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use folio_doc::{Block, Change, ChangeKind, Snapshot};
use folio_ledger::{Version, VersionStore};
use folio_nav::{create_paragraph, Navigator};
use folio_types::{Timestamp, VersionId};

use crate::error::{SdkError, SdkResult};

/// A live document bound to a version store.
///
/// Every edit goes through the tree navigator and appends a [`Change`] to the
/// pending list; [`commit`](Self::commit) hands a clone of the snapshot and
/// the pending changes to the store.
pub struct EditSession {
    id: Uuid,
    store: VersionStore,
    snapshot: Snapshot,
    pending: Vec<Change>,
    author: Option<String>,
}

impl EditSession {
    /// Start a session on the store's current head, or an empty document if
    /// the store has no commits.
    pub fn open(mut store: VersionStore) -> SdkResult<Self> {
        let snapshot = match store.get_head_version().cloned() {
            Some(head) => store.snapshot_at(&head)?.unwrap_or_default(),
            None => Snapshot::new(),
        };
        Ok(Self::with_snapshot(store, snapshot))
    }

    /// Start a session on an externally loaded snapshot.
    pub fn with_snapshot(store: VersionStore, snapshot: Snapshot) -> Self {
        let id = Uuid::now_v7();
        debug!(session = %id, blocks = snapshot.len(), "edit session started");
        Self {
            id,
            store,
            snapshot,
            pending: Vec::new(),
            author: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut VersionStore {
        &mut self.store
    }

    pub fn into_store(self) -> VersionStore {
        self.store
    }

    pub fn pending_changes(&self) -> &[Change] {
        &self.pending
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    // ---- Edits ----

    /// Replace block `index` with a paragraph of `text`.
    pub fn edit_paragraph(&mut self, index: usize, text: &str) -> SdkResult<()> {
        self.check_index(index)?;
        let old = Navigator::new(&mut self.snapshot).replace_block(index, create_paragraph(text));
        let old_text = old.map(|b| b.plain_text()).unwrap_or_default();
        self.record(
            Change::new(ChangeKind::Modify, paragraph_target(index), Timestamp::now())
                .with_old(old_text)
                .with_new(text)
                .with_description(format!("Edited paragraph {}", index + 1)),
        );
        Ok(())
    }

    /// Insert a paragraph so that it lands at `index` (`0..=len`).
    pub fn insert_paragraph(&mut self, index: usize, text: &str) -> SdkResult<()> {
        let len = self.snapshot.len();
        if index > len {
            return Err(SdkError::BlockOutOfRange { index, len });
        }
        Navigator::new(&mut self.snapshot).insert_block(index, create_paragraph(text));
        self.record(
            Change::new(ChangeKind::Insert, paragraph_target(index), Timestamp::now())
                .with_new(text)
                .with_description(format!("Inserted text at position {index}")),
        );
        Ok(())
    }

    /// Remove block `index`, returning it.
    pub fn delete_block(&mut self, index: usize) -> SdkResult<Block> {
        self.check_index(index)?;
        let removed = Navigator::new(&mut self.snapshot).delete_block(index);
        let Some(removed) = removed else {
            let len = self.snapshot.len();
            return Err(SdkError::BlockOutOfRange { index, len });
        };
        self.record(
            Change::new(ChangeKind::Delete, paragraph_target(index), Timestamp::now())
                .with_old(removed.plain_text())
                .with_description(format!("Deleted paragraph {}", index + 1)),
        );
        Ok(removed)
    }

    pub fn move_block(&mut self, from: usize, to: usize) -> SdkResult<()> {
        self.check_index(from)?;
        Navigator::new(&mut self.snapshot).move_block(from, to);
        self.record(
            Change::new(ChangeKind::Structure, paragraph_target(from), Timestamp::now())
                .with_old(from)
                .with_new(to)
                .with_description(format!("Moved block {} to {}", from + 1, to + 1)),
        );
        Ok(())
    }

    /// Replace every occurrence of `find` in block text with `replace`.
    ///
    /// Each changed block is rebuilt as a paragraph of its new text. Returns
    /// the number of blocks changed.
    pub fn replace_text(&mut self, find: &str, replace: &str, case_sensitive: bool) -> SdkResult<usize> {
        if find.is_empty() {
            return Err(SdkError::InvalidOperation("search text is empty".into()));
        }
        let pattern = RegexBuilder::new(&regex::escape(find))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| SdkError::InvalidOperation(e.to_string()))?;

        let hits: Vec<(usize, String)> = Navigator::new(&mut self.snapshot)
            .find_by_text(find, case_sensitive)
            .into_iter()
            .map(|(pos, block)| (pos.block, block.plain_text()))
            .collect();

        let mut count = 0;
        for (index, old_text) in hits.into_iter().rev() {
            let new_text = pattern.replace_all(&old_text, regex::NoExpand(replace)).into_owned();
            if new_text == old_text {
                continue;
            }
            Navigator::new(&mut self.snapshot).replace_block(index, create_paragraph(&new_text));
            self.record(
                Change::new(ChangeKind::Modify, paragraph_target(index), Timestamp::now())
                    .with_old(old_text)
                    .with_new(new_text)
                    .with_description(format!("Replace '{find}' with '{replace}'")),
            );
            count += 1;
        }
        Ok(count)
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        let old = std::mem::replace(&mut self.snapshot.metadata.title, title.map(str::to_string));
        if old.as_deref() == title {
            return;
        }
        self.record(
            Change::new(ChangeKind::Metadata, "metadata.title", Timestamp::now())
                .with_old(old.map_or(Value::Null, Value::from))
                .with_new(title.map_or(Value::Null, Value::from))
                .with_description("Changed title"),
        );
    }

    // ---- Versioning ----

    /// Commit the live snapshot with the pending changes.
    pub fn commit(&mut self, message: &str) -> SdkResult<Version> {
        let changes = std::mem::take(&mut self.pending);
        let version = self
            .store
            .commit(&self.snapshot, message, self.author.as_deref(), changes)?;
        info!(session = %self.id, version = %version.version_id, "session committed");
        Ok(version)
    }

    /// Drop pending edits and reload the head snapshot.
    pub fn discard(&mut self) -> SdkResult<()> {
        self.snapshot = match self.store.get_head_version().cloned() {
            Some(head) => self.store.snapshot_at(&head)?.unwrap_or_default(),
            None => Snapshot::new(),
        };
        let dropped = self.pending.len();
        self.pending.clear();
        debug!(session = %self.id, dropped, "session edits discarded");
        Ok(())
    }

    /// Roll the store back to `version` and continue editing from there.
    pub fn undo_to(&mut self, version: &VersionId) -> SdkResult<()> {
        let snapshot = self
            .store
            .rollback(version)?
            .ok_or_else(|| SdkError::VersionNotFound(version.to_string()))?;
        self.snapshot = snapshot;
        self.pending.clear();
        info!(session = %self.id, version = %version, "session rolled back");
        Ok(())
    }

    fn check_index(&self, index: usize) -> SdkResult<()> {
        let len = self.snapshot.len();
        if index >= len {
            return Err(SdkError::BlockOutOfRange { index, len });
        }
        Ok(())
    }

    fn record(&mut self, change: Change) {
        debug!(session = %self.id, kind = %change.kind, target = %change.target, "edit recorded");
        self.pending.push(change);
    }
}

fn paragraph_target(index: usize) -> String {
    format!("paragraph[{index}]")
}
