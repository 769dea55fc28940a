//! Document-level metadata: properties, styles, page setup, and comments.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A named style and its formatting properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl StyleDefinition {
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Page margins in points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Page size in points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageMargins {
    pub fn is_finite(&self) -> bool {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl PageSize {
    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentComment {
    pub id: String,
    pub author: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

/// Document properties carried alongside the block sequence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleDefinition>,
    #[serde(default)]
    pub default_style: Option<String>,
    #[serde(default)]
    pub page_margins: Option<PageMargins>,
    #[serde(default)]
    pub page_size: Option<PageSize>,
    #[serde(default)]
    pub track_changes_enabled: bool,
    #[serde(default)]
    pub document_comments: Vec<DocumentComment>,
    /// Identifiers of custom XML parts preserved from the source file.
    #[serde(default)]
    pub custom_parts: Vec<String>,
}

impl DocumentMetadata {
    /// Name of the first page measurement that is NaN or infinite.
    ///
    /// JSON has no encoding for non-finite numbers.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if self.page_margins.is_some_and(|m| !m.is_finite()) {
            return Some("page_margins");
        }
        if self.page_size.is_some_and(|s| !s.is_finite()) {
            return Some("page_size");
        }
        None
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Keywords as a set; order and duplicates are not significant.
    pub fn keyword_set(&self) -> BTreeSet<&str> {
        self.keywords.iter().map(String::as_str).collect()
    }

    /// Scalar text fields compared by the metadata diff, in report order.
    pub fn scalar_fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("title", self.title.as_deref()),
            ("author", self.author.as_deref()),
            ("subject", self.subject.as_deref()),
            ("comments", self.comments.as_deref()),
        ]
    }

    pub fn set_scalar_field(&mut self, field: &str, value: Option<String>) -> bool {
        let slot = match field {
            "title" => &mut self.title,
            "author" => &mut self.author,
            "subject" => &mut self.subject,
            "comments" => &mut self.comments,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_set_ignores_order() {
        let a = DocumentMetadata {
            keywords: vec!["b".into(), "a".into()],
            ..Default::default()
        };
        let b = DocumentMetadata {
            keywords: vec!["a".into(), "b".into(), "a".into()],
            ..Default::default()
        };
        assert_eq!(a.keyword_set(), b.keyword_set());
    }

    #[test]
    fn scalar_fields_settable_by_name() {
        let mut m = DocumentMetadata::titled("Draft");
        assert!(m.set_scalar_field("author", Some("ada".into())));
        assert!(!m.set_scalar_field("page_size", None));
        assert_eq!(m.scalar_fields()[1], ("author", Some("ada")));
    }

    #[test]
    fn style_builder() {
        let s = StyleDefinition::default().with_property("font", "Calibri");
        assert_eq!(s.properties.get("font").map(String::as_str), Some("Calibri"));
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let m: DocumentMetadata = serde_json::from_str(r#"{"title":"X"}"#).unwrap();
        assert_eq!(m.title.as_deref(), Some("X"));
        assert!(m.styles.is_empty());
        assert!(!m.track_changes_enabled);
    }
}
