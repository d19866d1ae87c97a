//! Template engine construction
//!
//! Every render builds a fresh tera instance from an immutable template
//! library and a fixed function table. Nested `Template` and `Compress`
//! calls build their own instance the same way.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tera::{Context, Tera, Value};

use super::ArtifactContent;
use super::functions::{CompressFunction, ReadFileFunction, TemplateFunction, indent_filter, indent_function};
use crate::{CompileError, Result};

/// Named template sources available to every engine
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    main: String,
    templates: Vec<(String, String)>,
}

impl TemplateLibrary {
    /// Build a library from in-memory sources; `main` must be one of them
    pub fn from_sources(main: impl Into<String>, templates: Vec<(String, String)>) -> Self {
        Self {
            main: main.into(),
            templates,
        }
    }

    /// Read the artifact template and any extra library templates
    ///
    /// Each file is registered under its file name.
    pub fn load(artifact_template: &Path, extra: &[String]) -> Result<Self> {
        let main = template_name(artifact_template);
        let mut templates = vec![(main.clone(), read_template(artifact_template)?)];

        for path in extra {
            let path = PathBuf::from(path);
            templates.push((template_name(&path), read_template(&path)?));
        }

        Ok(Self { main, templates })
    }

    /// Name the artifact template is registered under
    pub fn main(&self) -> &str {
        &self.main
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|(name, _)| name.as_str())
    }
}

fn template_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))
}

/// Create an engine holding the library and the custom function table
pub(crate) fn build_engine(library: &Arc<TemplateLibrary>, context: &Arc<Value>) -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(
        library
            .templates
            .iter()
            .map(|(name, source)| (name.as_str(), source.as_str())),
    )?;

    tera.register_function("Indent", indent_function);
    tera.register_filter("Indent", indent_filter);
    tera.register_function("ReadFile", ReadFileFunction);
    tera.register_function(
        "Template",
        TemplateFunction::new(Arc::clone(library), Arc::clone(context)),
    );
    tera.register_function(
        "Compress",
        CompressFunction::new(Arc::clone(library), Arc::clone(context)),
    );

    Ok(tera)
}

/// Render the library's main template against `content`
pub fn render_artifact(library: &TemplateLibrary, content: &ArtifactContent) -> Result<String> {
    let main = library.main().to_string();
    let template_error = |e: tera::Error| CompileError::Template {
        template: main.clone(),
        message: error_chain(&e),
    };

    let value = serde_json::to_value(content)?;
    let context = Context::from_value(value.clone()).map_err(template_error)?;

    let library = Arc::new(library.clone());
    let tera = build_engine(&library, &Arc::new(value)).map_err(template_error)?;
    tera.render(&main, &context).map_err(template_error)
}

/// Flatten an error and its sources into one line
///
/// Tera reports the useful detail (line, missing variable, failing
/// function) in the source chain rather than the top-level message.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
