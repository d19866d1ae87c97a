//! Normalization and validation
//!
//! Runs once after ingestion. Legacy `Targets` lists are folded into
//! `Rules`, the optional `_All` target is synthesized, and every rule is
//! checked for a single source and a resolvable `Ref`. The first failure
//! stops compilation.

use tracing::{debug, info};

use crate::config::CompilerConfig;
use crate::model::{RuleSource, TargetFile, TargetRule};
use crate::store::TargetStore;
use crate::{CompileError, Result};

/// Name of the synthesized aggregate target
pub const ALL_TARGET: &str = "_All";

/// Fold the KapeFiles `Targets` list into `Rules` and drop ignored fields
pub fn clear_legacy_fields(target: &mut TargetFile) {
    let legacy = std::mem::take(&mut target.targets);
    target.rules.extend(legacy);
    target.id.clear();
    target.version.clear();
    target.recreate_directories = false;
}

/// Build the `_All` target from the names present right now
pub fn make_all_target(store: &TargetStore) -> TargetFile {
    let mut all = TargetFile::new(ALL_TARGET);
    all.rules = store
        .names()
        .into_iter()
        .filter(|name| name.as_str() != ALL_TARGET)
        .map(TargetRule::reference)
        .collect();
    all
}

/// Normalize every target in place, then validate the whole store
pub fn normalize(store: &mut TargetStore, config: &mut CompilerConfig) -> Result<()> {
    if config.path_sep.is_empty() {
        config.path_sep = crate::config::DEFAULT_PATH_SEP.to_string();
    }

    for target in store.values_mut() {
        clear_legacy_fields(target);
    }

    if config.make_all_target {
        let all = make_all_target(store);
        info!(rules = all.rules.len(), "Adding {} target", ALL_TARGET);
        store.insert(ALL_TARGET, all);
    }

    validate(store)
}

/// Check every rule of every target
pub fn validate(store: &TargetStore) -> Result<()> {
    for (name, target) in store.iter() {
        for rule in &target.rules {
            validate_rule(rule, name, store)?;
        }
    }
    debug!(targets = store.len(), "Validated targets");
    Ok(())
}

/// Check one rule against the store
///
/// References are resolved by name only; cycles are not detected.
pub fn validate_rule(rule: &TargetRule, target: &str, store: &TargetStore) -> Result<()> {
    let fail = |message: String| CompileError::Validation {
        target: target.to_string(),
        rule: rule.name.clone(),
        message,
    };

    let sources = rule.sources();
    let source = match sources.as_slice() {
        [only] => *only,
        [] if !rule.file_mask.is_empty() || rule.recursive => {
            return Err(fail("FileMask and Recursive require Path".to_string()));
        }
        [] => {
            return Err(fail(
                "rule must set one of Ref, Glob, VQL or Path".to_string(),
            ));
        }
        many => {
            let names: Vec<String> = many.iter().map(ToString::to_string).collect();
            return Err(fail(format!(
                "rule sets more than one source: {}",
                names.join(", ")
            )));
        }
    };

    if source == RuleSource::Ref && !store.contains(&rule.r#ref) {
        return Err(fail(format!("reference to unknown target '{}'", rule.r#ref)));
    }

    Ok(())
}
