//! File transformers
//!
//! A transformer rewrites the raw bytes of a target file before it is
//! parsed, so that third-party rule formats can be fed through the same
//! loader. Transformers are selected by the `Transformer` config key; the
//! empty name is the identity transform.

use std::collections::HashMap;
use std::path::Path;

use crate::config::CompilerConfig;
use crate::{CompileError, Result};

/// Byte-to-byte pre-parse transform
///
/// Implementations must be side-effect free on the filesystem.
pub trait Transformer: Send + Sync {
    fn transform(&self, config: &CompilerConfig, path: &Path, data: Vec<u8>) -> Result<Vec<u8>>;
}

/// Passes bytes through untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&self, _config: &CompilerConfig, _path: &Path, data: Vec<u8>) -> Result<Vec<u8>> {
        Ok(data)
    }
}

impl<F> Transformer for F
where
    F: Fn(&CompilerConfig, &Path, Vec<u8>) -> Result<Vec<u8>> + Send + Sync,
{
    fn transform(&self, config: &CompilerConfig, path: &Path, data: Vec<u8>) -> Result<Vec<u8>> {
        self(config, path, data)
    }
}

/// Transformers by selector name
pub struct TransformerRegistry {
    transformers: HashMap<String, Box<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Registry holding only the identity transform under `""`
    pub fn new() -> Self {
        let mut registry = Self {
            transformers: HashMap::new(),
        };
        registry.register("", IdentityTransformer);
        registry
    }

    /// Register (or replace) a transformer under `name`
    pub fn register<T: Transformer + 'static>(&mut self, name: &str, transformer: T) {
        self.transformers
            .insert(name.to_string(), Box::new(transformer));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Transformer> {
        self.transformers
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| CompileError::Config(format!("Unknown transformer '{name}'")))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
