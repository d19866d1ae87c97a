//! Configuration Module
//!
//! Compiler configuration is a strict YAML document: unknown keys are
//! rejected. It is read once at startup and never mutated afterwards,
//! except for the defaults filled in during normalization.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CompilerConfig, DEFAULT_PATH_SEP, DEFAULT_TARGET_REGEX};
