//! Target File Loader
//!
//! Walks target directories and parses every matching file into the
//! target store.

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::CompilerConfig;
use crate::model::TargetFile;
use crate::store::TargetStore;
use crate::transform::Transformer;
use crate::{CompileError, Result};

/// Loads target files into a [`TargetStore`]
pub struct TargetLoader<'a> {
    config: &'a CompilerConfig,
    filter: Regex,
    skip_files: HashSet<&'a str>,
    transformer: &'a dyn Transformer,
}

impl<'a> TargetLoader<'a> {
    /// Create a loader from the config's filter regex and skip list
    pub fn new(config: &'a CompilerConfig, transformer: &'a dyn Transformer) -> Result<Self> {
        let filter = Regex::new(config.target_regex())
            .map_err(|e| CompileError::InvalidRegex(format!("TargetRegex: {e}")))?;

        Ok(Self {
            config,
            filter,
            skip_files: config.skip_files.iter().map(String::as_str).collect(),
            transformer,
        })
    }

    /// Load every configured target directory, in order
    pub fn load_all(&self, store: &mut TargetStore) -> Result<()> {
        for dir in &self.config.target_directories {
            self.load_directory(Path::new(dir), store)?;
        }
        Ok(())
    }

    /// Load all target files under `dir` recursively
    ///
    /// Symlinks are followed, so a linked file is loaded like a regular one.
    /// The first read, transform or parse failure aborts the walk.
    pub fn load_directory(&self, dir: &Path, store: &mut TargetStore) -> Result<()> {
        info!(dir = %dir.display(), "Loading targets from directory");

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.is_target_file(entry.path()) {
                continue;
            }

            let base_name = entry.file_name().to_string_lossy();
            if self.skip_files.contains(base_name.as_ref()) {
                debug!(path = %entry.path().display(), "Skipping file");
                continue;
            }

            self.load_file(entry.path(), store)?;
        }

        Ok(())
    }

    /// Read, transform and parse a single file
    pub fn load_file(&self, path: &Path, store: &mut TargetStore) -> Result<()> {
        let data = std::fs::read(path).map_err(|e| CompileError::io(path, e))?;

        let transformed = self
            .transformer
            .transform(self.config, path, data)
            .map_err(|e| {
                warn!(path = %path.display(), error = %e, "Failed to transform target file");
                match e {
                    CompileError::Transform { .. } => e,
                    other => CompileError::Transform {
                        file: path.to_path_buf(),
                        message: other.to_string(),
                    },
                }
            })?;

        load_target(&transformed, path, store)
    }

    fn is_target_file(&self, path: &Path) -> bool {
        self.filter.is_match(&path.to_string_lossy())
    }
}

/// Parse one target document and add it to the store
///
/// Documents without rules are dropped. A missing `Name` is taken from the
/// file's base name up to its first `.`.
pub fn load_target(data: &[u8], path: &Path, store: &mut TargetStore) -> Result<()> {
    debug!(path = %path.display(), "Loading target");

    if data.iter().all(u8::is_ascii_whitespace) {
        debug!(path = %path.display(), "Target file is empty, ignoring");
        return Ok(());
    }

    let mut target: TargetFile =
        serde_yaml::from_slice(data).map_err(|e| CompileError::Parse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if target.name.is_empty() {
        target.name = default_target_name(path);
    }

    if target.has_rules() {
        if store.insert(target.name.clone(), target).is_some() {
            debug!(path = %path.display(), "Target replaced an earlier definition");
        }
    } else {
        debug!(path = %path.display(), "Target has no rules, ignoring");
    }

    Ok(())
}

fn default_target_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.split('.').next().unwrap_or_default().to_string()
}
