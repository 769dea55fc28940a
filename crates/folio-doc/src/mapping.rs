//! Bidirectional element-to-location mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps element ids to native-format locations and back.
///
/// The two directions are kept exact inverses by [`PositionMapping::add_mapping`];
/// [`PositionMapping::inverse_violations`] reports entries that break this
/// (possible only for deserialized data).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionMapping {
    #[serde(default)]
    element_to_location: BTreeMap<String, String>,
    #[serde(default)]
    location_to_element: BTreeMap<String, String>,
    #[serde(default)]
    element_positions: BTreeMap<String, usize>,
}

impl PositionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `element` lives at `location`, `position` blocks into
    /// the document. Any previous pairing of either side is replaced.
    pub fn add_mapping(
        &mut self,
        element: impl Into<String>,
        location: impl Into<String>,
        position: usize,
    ) {
        let element = element.into();
        let location = location.into();
        if let Some(old_loc) = self.element_to_location.remove(&element) {
            self.location_to_element.remove(&old_loc);
        }
        if let Some(old_el) = self.location_to_element.remove(&location) {
            self.element_to_location.remove(&old_el);
            self.element_positions.remove(&old_el);
        }
        self.element_to_location.insert(element.clone(), location.clone());
        self.location_to_element.insert(location, element.clone());
        self.element_positions.insert(element, position);
    }

    pub fn remove_element(&mut self, element: &str) -> Option<String> {
        let location = self.element_to_location.remove(element)?;
        self.location_to_element.remove(&location);
        self.element_positions.remove(element);
        Some(location)
    }

    pub fn location_of(&self, element: &str) -> Option<&str> {
        self.element_to_location.get(element).map(String::as_str)
    }

    pub fn element_at(&self, location: &str) -> Option<&str> {
        self.location_to_element.get(location).map(String::as_str)
    }

    pub fn position_of(&self, element: &str) -> Option<usize> {
        self.element_positions.get(element).copied()
    }

    pub fn len(&self) -> usize {
        self.element_to_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.element_to_location.is_empty()
    }

    /// Element ids whose forward and reverse entries disagree.
    pub fn inverse_violations(&self) -> Vec<String> {
        let mut bad: Vec<String> = self
            .element_to_location
            .iter()
            .filter(|(el, loc)| self.location_to_element.get(*loc) != Some(*el))
            .map(|(el, _)| el.clone())
            .collect();
        for (loc, el) in &self.location_to_element {
            if self.element_to_location.get(el) != Some(loc) && !bad.contains(el) {
                bad.push(el.clone());
            }
        }
        bad
    }
}
