use std::collections::BTreeMap;
use std::fmt::Write;

use crate::types::Attribute;

/// Name-sorted view over an element's attributes, built per emission so the
/// output does not depend on insertion order. A repeated name keeps its last
/// value.
#[derive(Debug, Default)]
pub struct AttributeMap<'a> {
    entries: BTreeMap<&'a str, &'a str>,
}

impl<'a> AttributeMap<'a> {
    pub fn new(attributes: &'a [Attribute]) -> Self {
        let mut entries = BTreeMap::new();
        for (name, value) in attributes {
            entries.insert(name.as_str(), value.as_deref().unwrap_or(""));
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// ` name="value"` per entry. Values are written verbatim.
    pub fn write_to(&self, out: &mut String) {
        for (name, value) in self.iter() {
            let _ = write!(out, r#" {name}="{value}""#);
        }
    }
}
