//! Triage Collector Compiler - Entry Point
//!
//! Compiles a directory tree of collection target files into a single
//! artifact using the configuration file given on the command line.
//!
//! ```text
//! tcc --config tcc.yaml
//! tcc --config tcc.yaml --output build/Triage.zip --state-file state.json -v
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tcc_compiler::logging::init_logging;
use tcc_compiler::{Compiler, ConfigLoader, TransformerRegistry};
use tracing::info;

/// Command line interface for the triage collector compiler
#[derive(Parser, Debug)]
#[command(name = "tcc")]
#[command(about = "Compile collection target files into a triage artifact")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tcc.yaml")]
    pub config: PathBuf,

    /// Write to these outputs instead of the configured ones
    #[arg(short, long)]
    pub output: Vec<String>,

    /// Write the state snapshot here instead of the configured path
    #[arg(long)]
    pub state_file: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" })?;

    let mut config = ConfigLoader::new(&cli.config)
        .load()
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    if !cli.output.is_empty() {
        config.output = cli.output;
    }
    if cli.state_file.is_some() {
        config.state_file = cli.state_file;
    }

    let mut compiler =
        Compiler::new(config, &TransformerRegistry::new()).context("Compilation failed")?;
    compiler.run().context("Failed to write outputs")?;

    info!(
        targets = compiler.targets().len(),
        dependencies = compiler.dependencies().len(),
        "Done"
    );
    Ok(())
}
