//! Artifact rendering
//!
//! Flattens the target store into sorted rule and target records, adds
//! run metadata, and renders the result through the artifact template.

mod engine;
mod functions;

pub use engine::{TemplateLibrary, render_artifact};
pub use functions::{compress_encode, indent};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::process::Command;
use tracing::debug;

use crate::config::CompilerConfig;
use crate::deps::DependencySet;
use crate::model::{RuleSource, TargetRule};
use crate::sanitize::sanitize;
use crate::store::TargetStore;

/// One flattened rule, as seen by templates under `Rules`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleRecord {
    /// Sanitized name of the target this rule came from
    pub target: String,
    pub name: String,
    pub description: String,
    pub glob: String,
    pub r#ref: String,
    #[serde(rename = "VQL")]
    pub vql: String,
    /// Glob equivalent of a `Path`/`FileMask`/`Recursive` rule, empty otherwise
    pub legacy_glob: String,
}

/// One target summary, as seen by templates under `TargetFiles`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetRecord {
    pub name: String,
    pub description: String,
    pub preamble: String,
}

/// Everything a template can see
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArtifactContent {
    pub time: String,
    pub commit: String,
    pub rules: Vec<RuleRecord>,
    pub target_files: Vec<TargetRecord>,
    pub config: CompilerConfig,
    pub dependencies: DependencySet,
}

impl ArtifactContent {
    /// Build the projection and record query dependencies into `deps`
    ///
    /// Rules are sorted by sanitized target name followed by rule name;
    /// targets by name with `_` read as a space, so `_All` sorts first.
    pub fn build(
        store: &TargetStore,
        config: &CompilerConfig,
        deps: &mut DependencySet,
        time: String,
        commit: String,
    ) -> Self {
        let mut rules = Vec::new();
        let mut target_files = Vec::with_capacity(store.len());

        for target in store.values() {
            let target_name = sanitize(&target.name);
            target_files.push(TargetRecord {
                name: target_name.clone(),
                description: target.description.clone(),
                preamble: target.preamble.clone(),
            });

            for rule in &target.rules {
                rules.push(RuleRecord {
                    target: target_name.clone(),
                    name: sanitize(&rule.name),
                    description: rule.comment.clone(),
                    glob: rule.glob.clone(),
                    r#ref: sanitize(&rule.r#ref),
                    vql: rule.vql.clone(),
                    legacy_glob: legacy_glob(rule, config),
                });
            }
        }

        sort_rules(&mut rules);
        sort_targets(&mut target_files);

        for rule in rules.iter().filter(|r| !r.vql.is_empty()) {
            deps.extract(&rule.vql);
        }
        debug!(
            rules = rules.len(),
            targets = target_files.len(),
            dependencies = deps.len(),
            "Built artifact projection"
        );

        Self {
            time,
            commit,
            rules,
            target_files,
            config: config.clone(),
            dependencies: deps.clone(),
        }
    }
}

// Ties on the sort key fall back to the full record so the order never
// depends on ingestion order.
pub fn sort_rules(rules: &mut [RuleRecord]) {
    rules.sort_by_cached_key(|r| (format!("{}{}", r.target, r.name), r.clone()));
}

pub fn sort_targets(targets: &mut [TargetRecord]) {
    targets.sort_by_cached_key(|t| (t.name.replace('_', " "), t.clone()));
}

/// The `LegacyGlob` rendered for a rule
///
/// Legacy `Path`/`FileMask`/`Recursive` rules are turned into
/// `Path<sep>[**<sep>]FileMask`, with the mask rewritten through
/// `RegExToGlob` when it has an entry there. Other rules get nothing.
pub fn legacy_glob(rule: &TargetRule, config: &CompilerConfig) -> String {
    if rule.source() != Some(RuleSource::Legacy) {
        return String::new();
    }

    let sep = config.path_sep();
    let path = rule.path.replace(['\\', '/'], sep);
    let path = path.trim_end_matches(sep);

    let mask = if rule.file_mask.is_empty() {
        "*"
    } else {
        config
            .regex_to_glob
            .get(&rule.file_mask)
            .map_or(rule.file_mask.as_str(), String::as_str)
    };

    if rule.recursive {
        format!("{path}{sep}**{sep}{mask}")
    } else {
        format!("{path}{sep}{mask}")
    }
}

/// Current time as RFC 3339 UTC
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Short revision of the working directory's git checkout, or empty
pub fn source_revision() -> String {
    match Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => String::new(),
    }
}
