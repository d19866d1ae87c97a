//! Compilation driver
//!
//! Owns the target store for the lifetime of a run: ingestion and
//! normalization happen at construction, rendering and output in [`Compiler::run`].

use std::path::Path;
use tracing::info;

use crate::config::{CompilerConfig, ConfigLoader};
use crate::deps::DependencySet;
use crate::ingest::TargetLoader;
use crate::normalize::normalize;
use crate::output::{save_state, write_artifact};
use crate::render::{ArtifactContent, TemplateLibrary, render_artifact, source_revision, timestamp};
use crate::store::TargetStore;
use crate::transform::TransformerRegistry;
use crate::Result;

/// A single compilation run
#[derive(Debug)]
pub struct Compiler {
    config: CompilerConfig,
    targets: TargetStore,
    templates: TemplateLibrary,
    deps: DependencySet,
}

impl Compiler {
    /// Load the config at `path` and compile with the built-in transformers
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = ConfigLoader::new(path).load()?;
        Self::new(config, &TransformerRegistry::new())
    }

    /// Ingest, normalize and validate the targets named by `config`
    pub fn new(mut config: CompilerConfig, transformers: &TransformerRegistry) -> Result<Self> {
        let transformer = transformers.get(&config.transformer)?;

        let mut targets = TargetStore::new();
        TargetLoader::new(&config, transformer)?.load_all(&mut targets)?;

        let templates = TemplateLibrary::load(
            Path::new(&config.artifact_template),
            &config.template_library,
        )?;

        normalize(&mut targets, &mut config)?;
        info!(targets = targets.len(), "Targets loaded and validated");

        Ok(Self {
            config,
            targets,
            templates,
            deps: DependencySet::new(),
        })
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn targets(&self) -> &TargetStore {
        &self.targets
    }

    /// Artifacts referenced by rule queries in renders so far
    pub fn dependencies(&self) -> &DependencySet {
        &self.deps
    }

    /// Build the template projection for a render at this moment
    pub fn projection(&mut self) -> ArtifactContent {
        ArtifactContent::build(
            &self.targets,
            &self.config,
            &mut self.deps,
            timestamp(),
            source_revision(),
        )
    }

    /// Render the artifact template once
    pub fn artifact(&mut self) -> Result<String> {
        let content = self.projection();
        render_artifact(&self.templates, &content)
    }

    /// Render and write every configured output, then the state file
    pub fn run(&mut self) -> Result<()> {
        for output in self.config.output.clone() {
            let artifact = self.artifact()?;
            write_artifact(Path::new(&output), &self.config.name, &artifact)?;
        }

        if let Some(state_file) = self.config.state_file.as_deref().filter(|s| !s.is_empty()) {
            save_state(Path::new(state_file), &self.targets)?;
        }
        Ok(())
    }
}
