//! Custom template functions
//!
//! | Name | Arguments | Result |
//! |------|-----------|--------|
//! | `Indent` | `text`, `n` (also usable as a filter with `n`) | every line prefixed with `n` spaces |
//! | `ReadFile` | `path` or `paths` | concatenated file contents, unreadable files skipped |
//! | `Template` | `path` | the file rendered against the artifact projection |
//! | `Compress` | `name`, `args` | named template rendered, gzipped, base64 encoded |

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use tera::{Context, Value};
use tracing::debug;

use super::engine::{TemplateLibrary, build_engine, error_chain};

type Args = HashMap<String, Value>;

fn required<'a>(args: &'a Args, function: &str, name: &str) -> tera::Result<&'a Value> {
    args.get(name)
        .ok_or_else(|| tera::Error::msg(format!("{function}: missing argument `{name}`")))
}

fn required_str<'a>(args: &'a Args, function: &str, name: &str) -> tera::Result<&'a str> {
    required(args, function, name)?
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{function}: `{name}` must be a string")))
}

fn indent_width(args: &Args, function: &str) -> tera::Result<usize> {
    let n = required(args, function, "n")?
        .as_u64()
        .ok_or_else(|| tera::Error::msg(format!("{function}: `n` must be a non-negative integer")))?;
    usize::try_from(n).map_err(|e| tera::Error::msg(format!("{function}: {e}")))
}

/// Prefix every line of `text` with `width` spaces
pub fn indent(text: &str, width: usize) -> String {
    let prefix = " ".repeat(width);
    text.split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn indent_function(args: &Args) -> tera::Result<Value> {
    let text = required_str(args, "Indent", "text")?;
    let width = indent_width(args, "Indent")?;
    Ok(Value::String(indent(text, width)))
}

pub(crate) fn indent_filter(value: &Value, args: &Args) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("Indent: filtered value must be a string"))?;
    let width = indent_width(args, "Indent")?;
    Ok(Value::String(indent(text, width)))
}

/// Splices raw file contents into the output
pub(crate) struct ReadFileFunction;

impl tera::Function for ReadFileFunction {
    fn call(&self, args: &Args) -> tera::Result<Value> {
        let mut paths: Vec<&str> = Vec::new();
        if let Some(path) = args.get("path").and_then(Value::as_str) {
            paths.push(path);
        }
        if let Some(list) = args.get("paths").and_then(Value::as_array) {
            paths.extend(list.iter().filter_map(Value::as_str));
        }

        let mut result = String::new();
        for path in paths {
            match std::fs::read_to_string(path) {
                Ok(data) => result.push_str(&data),
                Err(e) => debug!(path, error = %e, "ReadFile skipping unreadable file"),
            }
        }
        Ok(Value::String(result))
    }
}

/// Renders another template file against the same projection
pub(crate) struct TemplateFunction {
    library: Arc<TemplateLibrary>,
    context: Arc<Value>,
}

impl TemplateFunction {
    pub(crate) fn new(library: Arc<TemplateLibrary>, context: Arc<Value>) -> Self {
        Self { library, context }
    }
}

impl tera::Function for TemplateFunction {
    fn call(&self, args: &Args) -> tera::Result<Value> {
        let path = required_str(args, "Template", "path")?;
        let source = std::fs::read_to_string(path)
            .map_err(|e| tera::Error::chain(format!("Template: unable to open {path}"), e))?;

        let mut tera = build_engine(&self.library, &self.context)?;
        tera.add_raw_template(path, &source)
            .map_err(|e| tera::Error::msg(format!("Template {path}: {}", error_chain(&e))))?;

        let context = Context::from_value(self.context.as_ref().clone())?;
        let rendered = tera
            .render(path, &context)
            .map_err(|e| tera::Error::msg(format!("Template {path}: {}", error_chain(&e))))?;
        Ok(Value::String(rendered))
    }
}

/// Renders a named template, then gzips and base64-encodes the result
pub(crate) struct CompressFunction {
    library: Arc<TemplateLibrary>,
    context: Arc<Value>,
}

impl CompressFunction {
    pub(crate) fn new(library: Arc<TemplateLibrary>, context: Arc<Value>) -> Self {
        Self { library, context }
    }
}

impl tera::Function for CompressFunction {
    fn call(&self, args: &Args) -> tera::Result<Value> {
        let name = required_str(args, "Compress", "name")?;

        // Objects become the context itself; anything else is bound to `Args`.
        let context = match args.get("args") {
            Some(value @ Value::Object(_)) => Context::from_value(value.clone())?,
            Some(value) => {
                let mut context = Context::new();
                context.insert("Args", value);
                context
            }
            None => Context::new(),
        };

        let tera = build_engine(&self.library, &self.context)?;
        let rendered = tera
            .render(name, &context)
            .map_err(|e| tera::Error::msg(format!("Compress {name}: {}", error_chain(&e))))?;

        let encoded = compress_encode(rendered.as_bytes())
            .map_err(|e| tera::Error::chain(format!("Compress {name}: gzip failed"), e))?;
        Ok(Value::String(encoded))
    }
}

/// Gzip at maximum compression, then standard base64
pub fn compress_encode(data: &[u8]) -> std::io::Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}
