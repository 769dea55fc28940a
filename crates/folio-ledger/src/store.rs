use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use folio_crypto::ContentHasher;
use folio_diff::{DiffEngine, DocumentDiff};
use folio_doc::{Change, Snapshot};
use folio_refs::{validate_branch_name, validate_tag_name, RefError, RefTable};
use folio_store::{
    decode_snapshot, encode_snapshot, BlobStore, FsBlobStore, InMemoryBlobStore, StoreError,
};
use folio_types::{ContentHash, Timestamp, VersionId};

use crate::config::StoreConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::index::IndexRecord;
use crate::version::Version;

/// Content-addressed, branchable version history of document snapshots.
///
/// One instance owns the current branch, the branch pointers and a snapshot
/// cache. It is not safe for concurrent callers; serialize access with a
/// mutex or keep one store per editing session.
pub struct VersionStore {
    pub(crate) config: StoreConfig,
    pub(crate) blobs: Box<dyn BlobStore>,
    /// Directory holding `index.json`; `None` keeps the index in memory only.
    pub(crate) root: Option<PathBuf>,
    pub(crate) versions: BTreeMap<VersionId, Version>,
    pub(crate) refs: RefTable,
    /// Snapshots of branch heads, keyed by content hash.
    pub(crate) cache: HashMap<ContentHash, Snapshot>,
    pub(crate) last_timestamp: Timestamp,
    pub(crate) diff: DiffEngine,
}

impl VersionStore {
    /// Open (creating if needed) an on-disk store at `root`.
    ///
    /// Reads `folio.toml` for configuration and `index.json` for history.
    pub fn open(root: &Path) -> LedgerResult<Self> {
        std::fs::create_dir_all(root)?;
        let config = StoreConfig::load(root)?;
        let blobs = FsBlobStore::open(root, config.verify_blobs)?;
        let mut store = Self::with_backend(config, Box::new(blobs));
        store.root = Some(root.to_path_buf());

        if let Some(record) = IndexRecord::load(root)? {
            store.refs = record.ref_table()?;
            store.last_timestamp = record
                .versions
                .iter()
                .map(|v| v.timestamp)
                .max()
                .unwrap_or_else(Timestamp::zero);
            store.versions = record
                .versions
                .into_iter()
                .map(|v| (v.version_id.clone(), v))
                .collect();
        }
        info!(
            root = %root.display(),
            versions = store.versions.len(),
            branch = store.refs.current(),
            "opened version store"
        );
        Ok(store)
    }

    /// A store whose blobs and index live only in memory.
    pub fn in_memory() -> Self {
        Self::with_backend(StoreConfig::default(), Box::new(InMemoryBlobStore::new()))
    }

    /// A store over an arbitrary blob backend. The index is not persisted.
    pub fn with_backend(config: StoreConfig, blobs: Box<dyn BlobStore>) -> Self {
        let refs = RefTable::new(config.default_branch.clone());
        Self {
            config,
            blobs,
            root: None,
            versions: BTreeMap::new(),
            refs,
            cache: HashMap::new(),
            last_timestamp: Timestamp::zero(),
            diff: DiffEngine::default(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Drop cached snapshots so the next load reads from the blob store.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Evict every cached snapshot that no branch head references.
    pub(crate) fn trim_cache(&mut self) {
        let heads: BTreeSet<ContentHash> = self
            .refs
            .iter()
            .filter_map(|(_, id)| self.versions.get(id))
            .map(|v| v.content_hash)
            .collect();
        let before = self.cache.len();
        self.cache.retain(|hash, _| heads.contains(hash));
        if self.cache.len() < before {
            debug!(evicted = before - self.cache.len(), kept = self.cache.len(), "snapshot cache trimmed");
        }
    }

    // ---- Commit ----

    /// Record `snapshot` as a new version on the current branch.
    ///
    /// The blob is written only if no blob with the same content hash exists.
    /// `author` defaults to the configured author.
    pub fn commit(
        &mut self,
        snapshot: &Snapshot,
        message: &str,
        author: Option<&str>,
        changes: Vec<Change>,
    ) -> LedgerResult<Version> {
        let branch = self.refs.current().to_string();
        let parent = self.refs.head().cloned();
        self.commit_on(&branch, parent, snapshot, message, author, changes)
    }

    pub(crate) fn commit_on(
        &mut self,
        branch: &str,
        parent: Option<VersionId>,
        snapshot: &Snapshot,
        message: &str,
        author: Option<&str>,
        changes: Vec<Change>,
    ) -> LedgerResult<Version> {
        let bytes = encode_snapshot(snapshot)?;
        let outcome = self.blobs.write(&bytes)?;
        if outcome.created {
            debug!(hash = %outcome.hash.short_hex(), bytes = bytes.len(), "snapshot blob written");
        } else {
            debug!(hash = %outcome.hash.short_hex(), "snapshot blob deduplicated");
        }
        self.cache.insert(outcome.hash, snapshot.clone());

        let timestamp = self.next_timestamp();
        let version_id = ContentHasher::VERSION.version_id(&timestamp, message, &outcome.hash);
        let version = Version {
            version_id: version_id.clone(),
            parent_version: parent,
            timestamp,
            author: author.unwrap_or(&self.config.default_author).to_string(),
            message: message.to_string(),
            changes,
            content_hash: outcome.hash,
            branch: branch.to_string(),
            tags: BTreeSet::new(),
        };
        self.versions.insert(version_id.clone(), version.clone());
        self.refs.checkout(branch, version_id.clone())?;
        self.trim_cache();
        self.save_index()?;

        info!(
            version = %version_id,
            branch,
            hash = %outcome.hash.short_hex(),
            changes = version.changes.len(),
            "committed version"
        );
        Ok(version)
    }

    fn next_timestamp(&mut self) -> Timestamp {
        let ts = Timestamp::after(&self.last_timestamp);
        self.last_timestamp = ts;
        ts
    }

    // ---- Checkout ----

    /// Load a version's snapshot and make it head.
    ///
    /// Head moves to `id`, the current branch becomes the version's branch
    /// label, and that branch's pointer follows. Unknown ids are `Ok(None)`.
    pub fn checkout(&mut self, id: &VersionId) -> LedgerResult<Option<Snapshot>> {
        let Some(version) = self.versions.get(id).cloned() else {
            debug!(version = %id, "checkout of unknown version");
            return Ok(None);
        };
        let snapshot = self.load(&version)?;
        self.refs.checkout(&version.branch, id.clone())?;
        self.trim_cache();
        self.save_index()?;
        info!(version = %id, branch = %version.branch, "checked out version");
        Ok(Some(snapshot))
    }

    /// Repoint head at an earlier version. No new version is created.
    pub fn rollback(&mut self, id: &VersionId) -> LedgerResult<Option<Snapshot>> {
        let snapshot = self.checkout(id)?;
        if snapshot.is_some() {
            info!(version = %id, "rolled back");
        }
        Ok(snapshot)
    }

    /// Load a version's snapshot without moving head.
    pub fn snapshot_at(&mut self, id: &VersionId) -> LedgerResult<Option<Snapshot>> {
        let Some(version) = self.versions.get(id).cloned() else {
            return Ok(None);
        };
        let snapshot = self.load(&version)?;
        self.trim_cache();
        Ok(Some(snapshot))
    }

    pub(crate) fn load(&mut self, version: &Version) -> LedgerResult<Snapshot> {
        if let Some(snapshot) = self.cache.get(&version.content_hash) {
            return Ok(snapshot.clone());
        }
        let bytes = match self.blobs.read(&version.content_hash) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                warn!(version = %version.version_id, hash = %version.content_hash, "snapshot blob missing");
                return Err(LedgerError::MissingBlob {
                    version: version.version_id.clone(),
                    hash: version.content_hash,
                });
            }
            Err(e) => return Err(self.corruption(version, e)),
        };
        let snapshot = decode_snapshot(&bytes).map_err(|e| self.corruption(version, e))?;
        self.cache.insert(version.content_hash, snapshot.clone());
        Ok(snapshot)
    }

    fn corruption(&self, version: &Version, err: StoreError) -> LedgerError {
        if !err.is_corruption() {
            return err.into();
        }
        warn!(version = %version.version_id, hash = %version.content_hash, error = %err, "snapshot blob corrupt");
        LedgerError::Corrupt {
            what: format!("snapshot {}", version.content_hash.short_hex()),
            reason: err.to_string(),
        }
    }

    // ---- Branches ----

    /// Create `name` at `from` (or the current head) and make it current.
    ///
    /// Returns `false` when the base version does not exist: `from` is
    /// unknown, or it is omitted and there is no head yet. Existing branches
    /// are never repointed; naming one is [`RefError::AlreadyExists`].
    pub fn create_branch(&mut self, name: &str, from: Option<&VersionId>) -> LedgerResult<bool> {
        validate_branch_name(name)?;
        if self.refs.contains(name) || self.newest_with_label(name).is_some() {
            return Err(RefError::AlreadyExists {
                name: name.to_string(),
            }
            .into());
        }
        let base = match from {
            Some(id) => self.versions.contains_key(id).then(|| id.clone()),
            None => self.refs.head().cloned(),
        };
        let Some(base) = base else {
            debug!(branch = name, from = ?from.map(|v| v.as_str()), "branch base not found");
            return Ok(false);
        };
        self.refs.create(name, base)?;
        self.save_index()?;
        info!(branch = name, head = ?self.refs.head().map(|v| v.as_str()), "created branch");
        Ok(true)
    }

    /// Check out the head of `name`. Unknown branches are `Ok(None)`.
    pub fn switch_branch(&mut self, name: &str) -> LedgerResult<Option<Snapshot>> {
        let Some(id) = self.branch_head(name) else {
            debug!(branch = name, "switch to unknown branch");
            return Ok(None);
        };
        let Some(version) = self.versions.get(&id).cloned() else {
            return Ok(None);
        };
        let snapshot = self.load(&version)?;
        self.refs.checkout(name, id)?;
        self.trim_cache();
        self.save_index()?;
        info!(branch = name, version = %version.version_id, "switched branch");
        Ok(Some(snapshot))
    }

    /// Head of `branch` from the pointer table, else the newest version
    /// carrying that label.
    pub fn branch_head(&self, branch: &str) -> Option<VersionId> {
        self.refs
            .head_of(branch)
            .filter(|id| self.versions.contains_key(*id))
            .cloned()
            .or_else(|| self.newest_with_label(branch).map(|v| v.version_id.clone()))
    }

    pub(crate) fn newest_with_label(&self, branch: &str) -> Option<&Version> {
        self.versions
            .values()
            .filter(|v| v.branch == branch)
            .max_by_key(|v| v.timestamp)
    }

    /// Every branch name, from pointers and version labels, sorted.
    pub fn get_branches(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.refs.iter().map(|(n, _)| n.to_string()).collect();
        names.extend(self.versions.values().map(|v| v.branch.clone()));
        names.insert(self.refs.current().to_string());
        names.into_iter().collect()
    }

    pub fn get_current_branch(&self) -> &str {
        self.refs.current()
    }

    pub fn get_head_version(&self) -> Option<&VersionId> {
        self.refs.head()
    }

    pub fn refs(&self) -> &RefTable {
        &self.refs
    }

    // ---- History ----

    pub fn get_version(&self, id: &VersionId) -> Option<&Version> {
        self.versions.get(id)
    }

    /// Look a version up by id or by unique id prefix.
    pub fn resolve(&self, prefix: &str) -> Option<&Version> {
        if let Ok(id) = VersionId::parse(prefix) {
            if let Some(v) = self.versions.get(&id) {
                return Some(v);
            }
        }
        let mut matches = self
            .versions
            .values()
            .filter(|v| v.version_id.as_str().starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(v), None) => Some(v),
            _ => None,
        }
    }

    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.versions.values()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Versions of `branch` (default: current), newest first.
    ///
    /// A branch's history is every version carrying its label plus the
    /// parent chain from its head, so the head is always included.
    pub fn get_history(&self, branch: Option<&str>, max_count: Option<usize>) -> Vec<&Version> {
        let branch = branch.unwrap_or_else(|| self.refs.current());
        let mut seen: BTreeSet<&VersionId> = BTreeSet::new();
        let mut history: Vec<&Version> = Vec::new();

        for v in self.versions.values().filter(|v| v.branch == branch) {
            if seen.insert(&v.version_id) {
                history.push(v);
            }
        }
        let mut cursor = self.refs.head_of(branch);
        while let Some(v) = cursor.and_then(|id| self.versions.get(id)) {
            if seen.insert(&v.version_id) {
                history.push(v);
            }
            cursor = v.parent_version.as_ref();
        }

        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(n) = max_count {
            history.truncate(n);
        }
        history
    }

    // ---- Tags and diffs ----

    /// Tag an existing version. Returns `false` for unknown versions.
    pub fn tag_version(&mut self, id: &VersionId, tag: &str) -> LedgerResult<bool> {
        validate_tag_name(tag)?;
        let Some(version) = self.versions.get_mut(id) else {
            return Ok(false);
        };
        version.tags.insert(tag.to_string());
        self.save_index()?;
        info!(version = %id, tag, "tagged version");
        Ok(true)
    }

    /// Diff two versions without moving head.
    pub fn get_diff(&mut self, v1: &VersionId, v2: &VersionId) -> LedgerResult<Option<DocumentDiff>> {
        let (Some(old), Some(new)) = (self.snapshot_at(v1)?, self.snapshot_at(v2)?) else {
            return Ok(None);
        };
        Ok(Some(self.diff.diff_labeled(&old, &new, v1.as_str(), v2.as_str())))
    }

    pub(crate) fn save_index(&self) -> LedgerResult<()> {
        match &self.root {
            Some(root) => IndexRecord::build(&self.versions, &self.refs).save(root),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for VersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStore")
            .field("root", &self.root)
            .field("versions", &self.versions.len())
            .field("refs", &self.refs)
            .finish()
    }
}
