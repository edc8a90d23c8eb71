//! Command-line interface.

mod output;

pub use output::Output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};

use crate::config::{DecompilerConfig, OptionsBuilder};
use crate::decompiler::ExternalDecompiler;
use crate::orchestrator::Orchestrator;

/// Bulk Java decompilation orchestrator driving an external Vineflower decompiler
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input: a directory, an archive (.jar/.war/.ear/.aar), or a .class file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory decompiled sources are written under
    #[arg(short, long, value_name = "DIR", default_value = "decompiled")]
    pub output: PathBuf,

    /// Worker threads (0 = one per CPU core)
    #[arg(short = 'j', long, value_name = "N", default_value_t = 0)]
    pub threads: usize,

    /// Delete each class file after its decompilation is verified
    #[arg(long)]
    pub delete_class_files: bool,

    /// Path to the Vineflower jar
    #[arg(
        long,
        value_name = "JAR",
        env = "DECLASSIFY_DECOMPILER_JAR",
        default_value = "vineflower.jar"
    )]
    pub decompiler_jar: PathBuf,

    /// Java launcher to use instead of the one on PATH
    #[arg(long, value_name = "PATH")]
    pub java: Option<PathBuf>,

    /// Skip decompiling inner classes
    #[arg(long)]
    pub no_inner_classes: bool,

    /// Indentation string for generated sources
    #[arg(long, value_name = "STRING")]
    pub indent: Option<String>,

    /// Raw decompiler option override (repeatable)
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        let config = DecompilerConfig::builder()
            .input_path(&self.input)
            .output_path(&self.output)
            .thread_count(self.threads)
            .delete_class_files(self.delete_class_files)
            .decompiler_jar(&self.decompiler_jar)
            .java_path(self.java.clone())
            .build();

        // Input errors fail before anything is scheduled or located.
        if !config.input_path.exists() {
            bail!("input path does not exist: {}", config.input_path.display());
        }

        let mut builder = OptionsBuilder::new()
            .with_inner_classes(!self.no_inner_classes)
            .with_threads(config.thread_count);
        if let Some(indent) = &self.indent {
            builder = builder.with_indent(indent);
        }
        for raw in &self.options {
            let (key, value) = raw
                .split_once('=')
                .with_context(|| format!("invalid --option '{raw}', expected KEY=VALUE"))?;
            if key.is_empty() {
                bail!("invalid --option '{raw}', expected KEY=VALUE");
            }
            builder = builder.with_option(key, value);
        }
        let options = builder.build();

        let decompiler = Arc::new(ExternalDecompiler::new(&config)?);
        let orchestrator = Orchestrator::new(config, options, decompiler);
        let stats = orchestrator.execute(&output)?;

        if stats.total > 0 {
            if stats.failed == 0 {
                output.success(&format!(
                    "decompiled {} of {} class files",
                    stats.succeeded, stats.total
                ));
            } else {
                output.warning(&format!(
                    "decompiled {} of {} class files, {} failed",
                    stats.succeeded, stats.total, stats.failed
                ));
            }
        }
        Ok(())
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
