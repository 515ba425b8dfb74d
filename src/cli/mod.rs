// Command-line interface
//
// `serve` runs the HTTP server; `run` performs a single generation from the
// terminal and optionally writes the generated tree to disk.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::ingest::compose_task;
use crate::pipeline::{RunCoordinator, RunResult};
use crate::workspace::{write_file_sets, write_json};

#[derive(Parser, Debug)]
#[command(name = "stackwright")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate a full-stack app from a task description with a review/fix loop", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.stackwright/config.toml, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Serve POST /api/generate over HTTP
    Serve {
        /// Bind address, overriding the config file
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Run one generation and print the result as JSON
    Run {
        /// What to build
        #[arg(short, long)]
        description: String,

        /// Brief to prepend to the description (.docx or plain text)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write generated files and result.json under this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Build the task from CLI inputs, run it, and write outputs if asked
pub async fn run_once(
    coordinator: &RunCoordinator,
    description: &str,
    file: Option<&Path>,
    out: Option<&Path>,
) -> Result<RunResult> {
    let upload = match file {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some((name, bytes))
        }
        None => None,
    };

    let task = compose_task(
        upload.as_ref().map(|(n, b)| (n.as_str(), b.as_slice())),
        description,
    );

    let result = coordinator.run(&task).await?;

    if let Some(out) = out {
        write_output(out, &result)?;
    }

    Ok(result)
}

/// Write both file sets under `out` plus `out/result.json`.
///
/// Nothing is written if any path is invalid or the sets collide.
pub fn write_output(out: &Path, result: &RunResult) -> Result<()> {
    let written = write_file_sets(out, &[&result.backend_code, &result.frontend_code])
        .context("Failed to write generated files")?;
    write_json(&out.join("result.json"), result)?;
    info!(out = %out.display(), files = written.len(), "Output written");
    Ok(())
}
