//! Insertion-ordered target store
//!
//! Maps target name to [`TargetFile`] and iterates in the order names were
//! first inserted. Re-inserting an existing name replaces the value in place.

use std::collections::HashMap;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::TargetFile;

/// Ordered `name -> TargetFile` map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetStore {
    entries: Vec<(String, TargetFile)>,
    index: HashMap<String, usize>,
}

impl TargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a target under `name`, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, target: TargetFile) -> Option<TargetFile> {
        let name = name.into();
        if let Some(&slot) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[slot].1, target));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, target));
        None
    }

    pub fn get(&self, name: &str) -> Option<&TargetFile> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &TargetFile> {
        self.entries.iter().map(|(_, target)| target)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut TargetFile> {
        self.entries.iter_mut().map(|(_, target)| target)
    }

    /// `(name, target)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetFile)> {
        self.entries
            .iter()
            .map(|(name, target)| (name.as_str(), target))
    }
}

impl Serialize for TargetStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, target) in self.iter() {
            map.serialize_entry(name, target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TargetStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = TargetStore;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of target name to target file")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TargetStore, A::Error> {
                let mut store = TargetStore::new();
                while let Some((name, target)) = access.next_entry::<String, TargetFile>()? {
                    store.insert(name, target);
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
