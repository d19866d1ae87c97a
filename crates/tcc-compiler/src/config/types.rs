//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Files ingested when `TargetRegex` is unset
pub const DEFAULT_TARGET_REGEX: &str = "(.tkape|.yaml)$";

/// Separator used when `PathSep` is unset
pub const DEFAULT_PATH_SEP: &str = "/";

/// Compiler configuration
///
/// Also exposed to templates as `Config`, so templates can read fields such
/// as `Config.Name` or `Config.Debug`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Artifact name; also names the member inside zip outputs
    pub name: String,
    pub description: String,

    /// Directories walked for target files, in order
    pub target_directories: Vec<String>,

    /// Regex over file paths selecting which files are ingested
    pub target_regex: String,

    /// Path to the main artifact template
    pub artifact_template: String,

    /// Extra templates registered under their file name, usable from
    /// `Compress`, `include` and `import`
    pub template_library: Vec<String>,

    /// Legacy `FileMask` values rewritten to a glob when deriving globs
    #[serde(rename = "RegExToGlob")]
    pub regex_to_glob: BTreeMap<String, String>,

    /// Destinations; a `.zip` suffix selects zip packaging
    pub output: Vec<String>,

    /// Where to write the state snapshot, if anywhere
    pub state_file: Option<String>,

    /// Separator used in `LegacyGlob`; empty means `/`
    pub path_sep: String,

    /// Named transform applied to raw file bytes before parsing
    pub transformer: String,

    /// Base names that are never ingested
    pub skip_files: Vec<String>,

    /// Build the artifact in debug mode
    pub debug: bool,

    /// Synthesize an `_All` target referencing every other target
    pub make_all_target: bool,
}

impl CompilerConfig {
    /// The target filter regex, falling back to [`DEFAULT_TARGET_REGEX`]
    pub fn target_regex(&self) -> &str {
        if self.target_regex.is_empty() {
            DEFAULT_TARGET_REGEX
        } else {
            &self.target_regex
        }
    }

    /// The path separator, falling back to [`DEFAULT_PATH_SEP`]
    pub fn path_sep(&self) -> &str {
        if self.path_sep.is_empty() {
            DEFAULT_PATH_SEP
        } else {
            &self.path_sep
        }
    }
}
