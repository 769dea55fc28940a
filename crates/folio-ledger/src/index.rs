//! On-disk index record.
//!
//! The index is one JSON document holding every [`Version`], the current
//! branch label, the head version and the branch pointer table. It is
//! rewritten whole, atomically, after every state change.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_refs::RefTable;
use folio_types::VersionId;

use crate::error::{LedgerError, LedgerResult};
use crate::version::Version;

pub const INDEX_FILE: &str = "index.json";
pub const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    /// Versions in ascending timestamp order.
    pub versions: Vec<Version>,
    pub current_branch: String,
    pub head_version: Option<VersionId>,
    /// Absent in indexes that predate explicit branch pointers.
    #[serde(default)]
    pub refs: Option<RefTable>,
}

fn default_format_version() -> u32 {
    INDEX_FORMAT_VERSION
}

impl IndexRecord {
    pub fn build(versions: &BTreeMap<VersionId, Version>, refs: &RefTable) -> Self {
        let mut list: Vec<Version> = versions.values().cloned().collect();
        list.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self {
            format_version: INDEX_FORMAT_VERSION,
            versions: list,
            current_branch: refs.current().to_string(),
            head_version: refs.head().cloned(),
            refs: Some(refs.clone()),
        }
    }

    /// Read `<root>/index.json`. A missing file is `Ok(None)`.
    pub fn load(root: &Path) -> LedgerResult<Option<Self>> {
        let path = root.join(INDEX_FILE);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: Self = serde_json::from_slice(&bytes).map_err(|e| LedgerError::Corrupt {
            what: "index".into(),
            reason: e.to_string(),
        })?;
        if record.format_version > INDEX_FORMAT_VERSION {
            return Err(LedgerError::Corrupt {
                what: "index".into(),
                reason: format!(
                    "format version {} is newer than supported {}",
                    record.format_version, INDEX_FORMAT_VERSION
                ),
            });
        }
        Ok(Some(record))
    }

    pub fn save(&self, root: &Path) -> LedgerResult<()> {
        let data = serde_json::to_vec_pretty(self)?;
        folio_store::fs::write_atomic(&root.join(INDEX_FILE), &data)?;
        debug!(versions = self.versions.len(), "index saved");
        Ok(())
    }

    /// The branch pointer table, rebuilt from labels when the record has none.
    ///
    /// Rebuilt pointers take the newest version carrying each label; the
    /// recorded head wins for the current branch.
    pub fn ref_table(&self) -> LedgerResult<RefTable> {
        if let Some(refs) = &self.refs {
            return Ok(refs.clone());
        }
        let mut refs = RefTable::new(self.current_branch.clone());
        let mut newest: BTreeMap<&str, &Version> = BTreeMap::new();
        for v in &self.versions {
            let slot = newest.entry(v.branch.as_str()).or_insert(v);
            if v.timestamp > slot.timestamp {
                *slot = v;
            }
        }
        for (branch, v) in newest {
            refs.point(branch, v.version_id.clone())?;
        }
        if let Some(head) = &self.head_version {
            refs.point(&self.current_branch, head.clone())?;
        }
        Ok(refs)
    }
}
