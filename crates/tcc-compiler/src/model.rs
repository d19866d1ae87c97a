//! Target File Model
//!
//! Serde types for one collection target file and the rules inside it.
//! Parsing is strict: unknown keys are rejected.

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept any YAML scalar where a string is expected (`Version: 1.0`).
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => format!("{f:?}"),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// A single file-collection rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct TargetRule {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,

    /// Name of another target whose rules are expanded in place
    #[serde(skip_serializing_if = "String::is_empty")]
    pub r#ref: String,

    /// Direct glob over the files to collect
    #[serde(skip_serializing_if = "String::is_empty")]
    pub glob: String,

    /// Query producing the files to collect. Result rows must carry the
    /// columns `OSPath, Size, Btime, Ctime, Mtime, Atime, Accessor`.
    #[serde(rename = "VQL", skip_serializing_if = "String::is_empty")]
    pub vql: String,

    // Legacy KapeFiles triple, equivalent to a glob.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_mask: String,
    #[serde(skip_serializing_if = "is_false")]
    pub recursive: bool,

    // Accepted for compatibility, otherwise ignored.
    #[serde(skip_serializing_if = "is_false")]
    pub always_add_to_queue: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub save_as_file_name: String,
}

/// Where a rule gets its files from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    Ref,
    Glob,
    Vql,
    Legacy,
}

impl RuleSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ref => "Ref",
            Self::Glob => "Glob",
            Self::Vql => "VQL",
            Self::Legacy => "Path",
        }
    }
}

impl std::fmt::Display for RuleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TargetRule {
    /// Create a rule that expands another target by name
    pub fn reference(target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            name: target.clone(),
            r#ref: target,
            ..Self::default()
        }
    }

    /// All populated sources, in declaration order
    ///
    /// The legacy triple counts as populated when `Path` is set.
    pub fn sources(&self) -> Vec<RuleSource> {
        let mut sources = Vec::new();
        if !self.r#ref.is_empty() {
            sources.push(RuleSource::Ref);
        }
        if !self.glob.is_empty() {
            sources.push(RuleSource::Glob);
        }
        if !self.vql.is_empty() {
            sources.push(RuleSource::Vql);
        }
        if !self.path.is_empty() {
            sources.push(RuleSource::Legacy);
        }
        sources
    }

    /// The single source of this rule, if exactly one is populated
    pub fn source(&self) -> Option<RuleSource> {
        match self.sources().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// One target file: a named collection of rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct TargetFile {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,

    #[serde(skip_serializing_if = "is_false")]
    pub recreate_directories: bool,

    /// KapeFiles name for the rule list; folded into `rules` on normalization
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetRule>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<TargetRule>,

    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "scalar_string"
    )]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Copied verbatim into the rendered artifact
    #[serde(skip_serializing_if = "String::is_empty")]
    pub preamble: String,
}

impl TargetFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True if either rule list is non-empty
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty() || !self.targets.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.targets.len()
    }
}
