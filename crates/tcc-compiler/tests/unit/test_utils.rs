//! Shared test utilities for tcc-compiler tests

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::fs;
use std::path::{Path, PathBuf};

use tcc_compiler::{TargetFile, TargetRule, TargetStore};
use tempfile::TempDir;

/// Write `content` to `relative_path` under the temp dir, creating parents
pub fn write_file(temp: &TempDir, relative_path: &str, content: &str) -> PathBuf {
    let full_path = temp.path().join(relative_path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&full_path, content).unwrap();
    full_path
}

/// Path as an owned string, for config fields
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn glob_rule(name: &str, glob: &str) -> TargetRule {
    TargetRule {
        name: name.to_string(),
        glob: glob.to_string(),
        ..TargetRule::default()
    }
}

pub fn ref_rule(name: &str, target: &str) -> TargetRule {
    TargetRule {
        name: name.to_string(),
        r#ref: target.to_string(),
        ..TargetRule::default()
    }
}

pub fn vql_rule(name: &str, query: &str) -> TargetRule {
    TargetRule {
        name: name.to_string(),
        vql: query.to_string(),
        ..TargetRule::default()
    }
}

pub fn target(name: &str, rules: Vec<TargetRule>) -> TargetFile {
    TargetFile {
        name: name.to_string(),
        rules,
        ..TargetFile::default()
    }
}

/// Store holding the given targets in order
pub fn store_of(targets: Vec<TargetFile>) -> TargetStore {
    let mut store = TargetStore::new();
    for t in targets {
        store.insert(t.name.clone(), t);
    }
    store
}
