//! Resource attributes
//!
//! A capture record stores its resource as a flat attribute list. Records
//! from the same process repeat the same list, so the merged map doubles as
//! the grouping key at export time.

use std::collections::BTreeMap;

use crate::domain::attr::{AttrValue, Attribute, DecodeWarning, decode_attributes};
use crate::stream::record::RawKeyValue;

/// Merged resource attribute map
///
/// Keys are unique; when the raw list repeats a key, the later entry wins.
/// An empty list is a valid, empty resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    entries: BTreeMap<String, AttrValue>,
}

impl Resource {
    /// Decode and merge a raw attribute list
    pub fn from_entries(raw: &[RawKeyValue], warnings: &mut Vec<DecodeWarning>) -> Self {
        Self::from_attributes(decode_attributes(raw, warnings))
    }

    /// Merge already-decoded attributes; later duplicates win
    pub fn from_attributes(attrs: impl IntoIterator<Item = Attribute>) -> Self {
        let mut entries = BTreeMap::new();
        for attr in attrs {
            entries.insert(attr.key, attr.value);
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as a plain attribute list, in key order
    pub fn to_entries(&self) -> Vec<Attribute> {
        self.entries
            .iter()
            .map(|(key, value)| Attribute {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }
}
