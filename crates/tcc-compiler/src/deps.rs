//! Artifact dependency extraction
//!
//! Rule queries may call other artifacts as `Artifact.<Name>(...)`. Every
//! such name is recorded so the rendered artifact can declare what it
//! depends on.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::LazyLock;

static ARTIFACT_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Artifact\.([^\s(]+)\(").expect("Invalid regex"));

/// Deduplicated artifact names, kept in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name; returns false if it was already present
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    /// Record every artifact called from `query`
    pub fn extract(&mut self, query: &str) {
        for name in artifact_calls(query) {
            self.insert(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl Serialize for DependencySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.order.serialize(serializer)
    }
}

/// Names of all artifacts called from `query`, duplicates included
pub fn artifact_calls(query: &str) -> impl Iterator<Item = &str> {
    ARTIFACT_CALL
        .captures_iter(query)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
}
