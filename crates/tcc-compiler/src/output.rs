//! Artifact and state file writers

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::store::TargetStore;
use crate::{CompileError, Result};

/// How an output destination is packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Zip,
}

impl OutputFormat {
    /// `.zip` destinations are packaged, everything else is written as-is
    pub fn for_path(path: &Path) -> Self {
        if path.to_string_lossy().ends_with(".zip") {
            Self::Zip
        } else {
            Self::Yaml
        }
    }
}

/// Write `artifact` to `path`, truncating any existing file
///
/// Zip destinations get a single member named `<name>.yaml`.
pub fn write_artifact(path: &Path, name: &str, artifact: &str) -> Result<()> {
    let file = File::create(path).map_err(|e| CompileError::io(path, e))?;

    match OutputFormat::for_path(path) {
        OutputFormat::Zip => {
            info!(path = %path.display(), "Generating Zip artifact pack");
            let mut zip = ZipWriter::new(file);
            zip.start_file(format!("{name}.yaml"), SimpleFileOptions::default())?;
            zip.write_all(artifact.as_bytes())
                .map_err(|e| CompileError::io(path, e))?;
            zip.finish()?;
        }
        OutputFormat::Yaml => {
            info!(path = %path.display(), "Generating YAML artifact pack");
            let mut file = file;
            file.write_all(artifact.as_bytes())
                .map_err(|e| CompileError::io(path, e))?;
        }
    }

    Ok(())
}

/// Serialize the whole target store as indented JSON
pub fn save_state(path: &Path, store: &TargetStore) -> Result<()> {
    info!(path = %path.display(), targets = store.len(), "Writing state file");
    let serialized = serde_json::to_string_pretty(store)?;
    std::fs::write(path, serialized).map_err(|e| CompileError::io(path, e))
}

/// Read a state file written by [`save_state`]
pub fn load_state(path: &Path) -> Result<TargetStore> {
    let data = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| CompileError::Parse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })
}
