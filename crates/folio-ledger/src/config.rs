use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

pub const CONFIG_FILE: &str = "folio.toml";

const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Branch selected in a fresh store.
    pub default_branch: String,
    /// Author recorded when a commit names none.
    pub default_author: String,
    /// Age after which untagged versions are eligible for cleanup.
    pub retention_days: u32,
    /// Re-hash blobs on read.
    pub verify_blobs: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".into(),
            default_author: "folio".into(),
            retention_days: 30,
            verify_blobs: true,
        }
    }
}

impl StoreConfig {
    /// Read `<root>/folio.toml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> LedgerResult<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> LedgerResult<Self> {
        toml::from_str(text).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> LedgerResult<String> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.retention_days) * SECS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StoreConfig::default();
        assert_eq!(c.default_branch, "main");
        assert_eq!(c.default_author, "folio");
        assert_eq!(c.retention_days, 30);
        assert!(c.verify_blobs);
        assert_eq!(c.retention(), Duration::from_secs(30 * 86_400));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = StoreConfig::from_toml("default_branch = \"trunk\"\nretention_days = 7\n").unwrap();
        assert_eq!(c.default_branch, "trunk");
        assert_eq!(c.retention_days, 7);
        assert_eq!(c.default_author, "folio");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = StoreConfig::from_toml("retention_days = \"soon\"").unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(StoreConfig::load(dir.path()).unwrap(), StoreConfig::default());
        let custom = StoreConfig {
            verify_blobs: false,
            ..StoreConfig::default()
        };
        std::fs::write(dir.path().join(CONFIG_FILE), custom.to_toml().unwrap()).unwrap();
        assert_eq!(StoreConfig::load(dir.path()).unwrap(), custom);
    }
}
