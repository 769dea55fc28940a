//! Opaque native-format fragments that the block tree cannot represent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    HeaderFooter,
    Footnote,
    Endnote,
    Complex,
    Embedded,
}

/// Borrowed view of a stored fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentRef<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

/// Fragment store keyed by fragment id within each category.
///
/// Embedded objects are binary and serialize as hex strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatFragments {
    #[serde(default)]
    pub headers_footers: BTreeMap<String, String>,
    #[serde(default)]
    pub footnotes: BTreeMap<String, String>,
    #[serde(default)]
    pub endnotes: BTreeMap<String, String>,
    #[serde(default)]
    pub complex_elements: BTreeMap<String, String>,
    #[serde(default, with = "hex_map")]
    pub embedded_objects: BTreeMap<String, Vec<u8>>,
}

impl FormatFragments {
    /// Store a textual fragment. Returns false for [`FragmentKind::Embedded`],
    /// which takes bytes via [`FormatFragments::add_embedded`].
    pub fn add_fragment(
        &mut self,
        kind: FragmentKind,
        id: impl Into<String>,
        content: impl Into<String>,
    ) -> bool {
        let map = match kind {
            FragmentKind::HeaderFooter => &mut self.headers_footers,
            FragmentKind::Footnote => &mut self.footnotes,
            FragmentKind::Endnote => &mut self.endnotes,
            FragmentKind::Complex => &mut self.complex_elements,
            FragmentKind::Embedded => return false,
        };
        map.insert(id.into(), content.into());
        true
    }

    pub fn add_embedded(&mut self, id: impl Into<String>, bytes: Vec<u8>) {
        self.embedded_objects.insert(id.into(), bytes);
    }

    /// Look up a fragment by id across all categories.
    pub fn get_fragment(&self, id: &str) -> Option<(FragmentKind, FragmentRef<'_>)> {
        let textual = [
            (FragmentKind::HeaderFooter, &self.headers_footers),
            (FragmentKind::Footnote, &self.footnotes),
            (FragmentKind::Endnote, &self.endnotes),
            (FragmentKind::Complex, &self.complex_elements),
        ];
        for (kind, map) in textual {
            if let Some(text) = map.get(id) {
                return Some((kind, FragmentRef::Text(text)));
            }
        }
        self.embedded_objects
            .get(id)
            .map(|bytes| (FragmentKind::Embedded, FragmentRef::Binary(bytes)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_fragment(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.headers_footers.len()
            + self.footnotes.len()
            + self.endnotes.len()
            + self.complex_elements.len()
            + self.embedded_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod hex_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(map.iter().map(|(k, v)| (k, hex::encode(v))))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(k, v)| {
                hex::decode(&v)
                    .map(|bytes| (k, bytes))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get_across_kinds() {
        let mut f = FormatFragments::default();
        assert!(f.add_fragment(FragmentKind::Footnote, "fn1", "<w:footnote/>"));
        assert!(!f.add_fragment(FragmentKind::Embedded, "x", "nope"));
        f.add_embedded("img1", vec![0xde, 0xad]);

        assert_eq!(
            f.get_fragment("fn1"),
            Some((FragmentKind::Footnote, FragmentRef::Text("<w:footnote/>")))
        );
        assert_eq!(
            f.get_fragment("img1"),
            Some((FragmentKind::Embedded, FragmentRef::Binary(&[0xde, 0xad])))
        );
        assert!(f.get_fragment("x").is_none());
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn embedded_bytes_serialize_as_hex() {
        let mut f = FormatFragments::default();
        f.add_embedded("img1", vec![0x01, 0xff]);
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["embedded_objects"]["img1"], "01ff");
        let back: FormatFragments = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn bad_hex_rejected() {
        let json = serde_json::json!({"embedded_objects": {"a": "zz"}});
        assert!(serde_json::from_value::<FormatFragments>(json).is_err());
    }
}
