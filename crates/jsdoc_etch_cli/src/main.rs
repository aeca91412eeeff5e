//! jsdoc-etch: translate TypeScript sources into JavaScript with JSDoc
//!
//! Usage:
//!   jsdoc-etch src/ dist/
//!   jsdoc-etch src/index.ts
//!   jsdoc-etch --skip-type-documentation src/index.ts out/index.js

mod sources;

use anyhow::{Context, Result};
use clap::Parser;
use jsdoc_etch::{translate, TranslateError, TranslateOptions};
use sources::{collect_sources, error_snapshot_path, SourceFile};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsdoc-etch",
    version,
    about = "Translate TypeScript into JavaScript documented with JSDoc"
)]
struct Cli {
    /// A TypeScript file, or a directory holding TypeScript files
    input: PathBuf,

    /// The output file or directory (required for a directory input)
    output: Option<PathBuf>,

    /// error, warn, info, debug or trace
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    /// Only erase types, do not add JSDoc
    #[arg(long)]
    skip_type_documentation: bool,

    /// Project type configuration file
    #[arg(short = 'p', long)]
    ts_config_file_path: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut options = TranslateOptions::new().add_type_documentation(!cli.skip_type_documentation);
    if let Some(path) = &cli.ts_config_file_path {
        options = options.type_config_path(path);
    }

    let sources = collect_sources(&cli.input, cli.output.as_deref())?;
    for source in &sources {
        translate_file(source, &options)?;
    }
    Ok(())
}

/// Logs go to stderr; `JSDOC_ETCH_LOG` overrides the level flag
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env("JSDOC_ETCH_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Translate one file. A failed translation leaves error snapshots next to
/// the intended output instead, only I/O problems are returned.
fn translate_file(source: &SourceFile, options: &TranslateOptions) -> Result<()> {
    tracing::info!("transpiling file: {}", source.input.display());
    let typescript =
        fs::read_to_string(&source.input).with_context(|| format!("Cannot read '{}'", source.input.display()))?;

    match translate(&typescript, source.is_jsx(), options) {
        Ok(javascript) => {
            fs::write(&source.output, javascript)
                .with_context(|| format!("Cannot write '{}'", source.output.display()))?;
            tracing::info!("file is successfully transpiled to: {}", source.output.display());
        }
        Err(error) => {
            tracing::warn!(
                reason = %error.reason,
                "An error occurred while transpiling file: {}",
                source.input.display()
            );
            write_snapshots(source, &error)?;
        }
    }
    Ok(())
}

fn write_snapshots(source: &SourceFile, error: &TranslateError) -> Result<()> {
    for (which, text) in [("oldText", &error.old_text), ("newText", &error.new_text)] {
        if text.is_empty() {
            continue;
        }
        let path = error_snapshot_path(source, which);
        fs::write(&path, text).with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::warn!("The '{}' is written to: {}", which, path.display());
    }
    Ok(())
}
