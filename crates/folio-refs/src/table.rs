use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_types::VersionId;

use crate::error::{RefError, RefResult};
use crate::names::validate_branch_name;

/// Branch pointers plus the current branch name.
///
/// Head is the pointer of the current branch. A freshly selected branch
/// with no commits has no pointer, so head is `None` until its first commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefTable {
    current: String,
    #[serde(default)]
    branches: BTreeMap<String, VersionId>,
}

impl RefTable {
    pub fn new(default_branch: impl Into<String>) -> Self {
        Self {
            current: default_branch.into(),
            branches: BTreeMap::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn head(&self) -> Option<&VersionId> {
        self.branches.get(&self.current)
    }

    pub fn head_of(&self, branch: &str) -> Option<&VersionId> {
        self.branches.get(branch)
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.branches.contains_key(branch)
    }

    /// Point `branch` at `version`.
    pub fn point(&mut self, branch: &str, version: VersionId) -> RefResult<()> {
        validate_branch_name(branch)?;
        debug!(branch, version = %version, "branch pointer moved");
        self.branches.insert(branch.to_string(), version);
        Ok(())
    }

    /// Select `branch` and point it at `version` in one step.
    pub fn checkout(&mut self, branch: &str, version: VersionId) -> RefResult<()> {
        self.point(branch, version)?;
        self.current = branch.to_string();
        Ok(())
    }

    /// Create `branch` at `version` and select it.
    ///
    /// Fails with [`RefError::AlreadyExists`] if the branch has a pointer;
    /// an existing head is never overwritten.
    pub fn create(&mut self, branch: &str, version: VersionId) -> RefResult<()> {
        validate_branch_name(branch)?;
        if self.contains(branch) {
            return Err(RefError::AlreadyExists {
                name: branch.to_string(),
            });
        }
        self.checkout(branch, version)
    }

    /// Drop a pointer unconditionally, even for the current branch.
    pub fn clear_pointer(&mut self, branch: &str) -> Option<VersionId> {
        self.branches.remove(branch)
    }

    /// `(name, head)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VersionId)> {
        self.branches.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Branch names whose pointer satisfies `pred`.
    pub fn branches_where(&self, mut pred: impl FnMut(&VersionId) -> bool) -> Vec<String> {
        self.branches
            .iter()
            .filter(|(_, v)| pred(v))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vid(s: &str) -> VersionId {
        VersionId::parse(s).unwrap()
    }

    #[test]
    fn new_table_has_no_head() {
        let table = RefTable::new("main");
        assert_eq!(table.current(), "main");
        assert!(table.head().is_none());
    }

    #[test]
    fn head_follows_current_branch() {
        let mut table = RefTable::new("main");
        table.point("main", vid("aaaaaaaaaaaa")).unwrap();
        table.point("draft", vid("bbbbbbbbbbbb")).unwrap();
        assert_eq!(table.head(), Some(&vid("aaaaaaaaaaaa")));
        table.checkout("draft", vid("bbbbbbbbbbbb")).unwrap();
        assert_eq!(table.head(), Some(&vid("bbbbbbbbbbbb")));
    }

    #[test]
    fn checkout_moves_pointer_and_current() {
        let mut table = RefTable::new("main");
        table.checkout("review", vid("cccccccccccc")).unwrap();
        assert_eq!(table.current(), "review");
        assert_eq!(table.head_of("review"), Some(&vid("cccccccccccc")));
    }

    #[test]
    fn invalid_names_rejected() {
        let mut table = RefTable::new("main");
        assert!(table.point("bad name", vid("aaaaaaaaaaaa")).is_err());
        assert!(table.create("..", vid("aaaaaaaaaaaa")).is_err());
        assert_eq!(table.current(), "main");
    }

    #[test]
    fn create_refuses_existing_branch() {
        let mut table = RefTable::new("main");
        table.point("main", vid("aaaaaaaaaaaa")).unwrap();
        let err = table.create("main", vid("bbbbbbbbbbbb")).unwrap_err();
        assert!(matches!(err, RefError::AlreadyExists { ref name } if name == "main"));
        assert_eq!(table.head_of("main"), Some(&vid("aaaaaaaaaaaa")));

        table.create("draft", vid("bbbbbbbbbbbb")).unwrap();
        assert_eq!(table.current(), "draft");
        assert_eq!(table.branches_where(|_| true), vec!["draft".to_string(), "main".to_string()]);
    }

    #[test]
    fn serde_roundtrip() {
        let mut table = RefTable::new("main");
        table.point("main", vid("aaaaaaaaaaaa")).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        let back: RefTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
