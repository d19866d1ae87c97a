//! Triage Collector Compiler
//!
//! Compiles a tree of declarative collection target files into a single
//! rendered artifact. The pipeline runs in fixed stages:
//!
//! - Ingestion: walk the configured target directories and parse every
//!   matching file into a [`TargetFile`]
//! - Normalization: fold legacy `Targets` lists into `Rules` and optionally
//!   synthesize the `_All` aggregate target
//! - Validation: every rule has exactly one source and every `Ref` resolves
//! - Rendering: flatten, sort and feed the targets through a tera template
//! - Output: write plain or zip-packaged artifacts and the state snapshot
//!
//! # Example
//!
//! ```ignore
//! use tcc_compiler::Compiler;
//!
//! let mut compiler = Compiler::from_config_file("tcc.yaml")?;
//! compiler.run()?;
//! ```

pub mod compiler;
pub mod config;
pub mod deps;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod output;
pub mod render;
pub mod sanitize;
pub mod store;
pub mod transform;

use std::path::PathBuf;
use thiserror::Error;

pub use compiler::Compiler;
pub use config::{CompilerConfig, ConfigLoader};
pub use deps::DependencySet;
pub use ingest::TargetLoader;
pub use model::{RuleSource, TargetFile, TargetRule};
pub use render::{ArtifactContent, RuleRecord, TargetRecord};
pub use sanitize::sanitize;
pub use store::TargetStore;
pub use transform::{IdentityTransformer, Transformer, TransformerRegistry};

/// Result type for compilation operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Compilation errors
///
/// Every failure is terminal for the current run; the variant carries the
/// file, target or template that triggered it.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error("Transform error in {file}: {message}")]
    Transform { file: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    #[error("Invalid rule '{rule}' in target '{target}': {message}")]
    Validation {
        target: String,
        rule: String,
        message: String,
    },

    #[error("Template error in {template}: {message}")]
    Template { template: String, message: String },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CompileError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
