use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use folio_types::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Delete,
    Modify,
    Structure,
    Style,
    Metadata,
}

/// Audit record of one edit, carried inside a committed version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    /// Locator of the edited element, e.g. `paragraph[3]` or `metadata.title`.
    pub target: String,
    #[serde(default)]
    pub old_value: Option<Value>,
    #[serde(default)]
    pub new_value: Option<Value>,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub description: String,
}

impl Change {
    pub fn new(kind: ChangeKind, target: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            kind,
            target: target.into(),
            old_value: None,
            new_value: None,
            timestamp,
            description: String::new(),
        }
    }

    pub fn with_old(mut self, value: impl Into<Value>) -> Self {
        self.old_value = Some(value.into());
        self
    }

    pub fn with_new(mut self, value: impl Into<Value>) -> Self {
        self.new_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_values() {
        let c = Change::new(ChangeKind::Modify, "paragraph[0]", Timestamp::new(5, 0))
            .with_old("Hello")
            .with_new("Hello world")
            .with_description("Edited paragraph 0");
        assert_eq!(c.old_value, Some(Value::from("Hello")));
        assert_eq!(c.kind.to_string(), "modify");
        let json = serde_json::to_string(&c).unwrap();
        let back: Change = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
