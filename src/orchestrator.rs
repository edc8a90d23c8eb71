//! Top-level run coordination: assemble jobs, fan out, aggregate counts.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cli::Output;
use crate::config::{DecompilerConfig, DecompilerOptions};
use crate::decompiler::Decompiler;
use crate::discover;
use crate::engine::TaskManager;
use crate::task::DecompileTask;
use crate::Result;

/// Aggregate counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct Orchestrator {
    config: Arc<DecompilerConfig>,
    options: Arc<DecompilerOptions>,
    decompiler: Arc<dyn Decompiler>,
    engine: TaskManager,
}

impl Orchestrator {
    pub fn new(
        config: DecompilerConfig,
        options: DecompilerOptions,
        decompiler: Arc<dyn Decompiler>,
    ) -> Self {
        let engine = TaskManager::new(config.thread_count);
        Self {
            config: Arc::new(config),
            options: Arc::new(options),
            decompiler,
            engine,
        }
    }

    /// Run the whole batch. Only pre-flight input errors surface as `Err`;
    /// per-unit failures end up in the returned counts.
    pub fn execute(&self, output: &Output) -> Result<RunStats> {
        info!(
            "starting decompilation with {} worker threads",
            self.engine.worker_count()
        );
        info!("input: {}", self.config.input_path.display());
        info!("output: {}", self.config.output_path.display());

        let jobs = discover::assemble_jobs(&self.config, &self.engine)?;
        if jobs.is_empty() {
            output.warning("no decompilable files found");
            return Ok(RunStats::default());
        }
        output.info(&format!("decompiling {} class files...", jobs.len()));

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let results = self.engine.run(
            jobs,
            |job| {
                DecompileTask::new(
                    job,
                    self.config.clone(),
                    self.options.clone(),
                    self.decompiler.clone(),
                )
            },
            |result| {
                if result.success {
                    succeeded += 1;
                } else {
                    failed += 1;
                    warn!(
                        "decompilation failed: {} ({})",
                        result.job.source_name(),
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
            },
        );

        let stats = RunStats {
            total: results.len(),
            succeeded,
            failed,
        };
        info!(
            "decompilation complete: {} total, {} succeeded, {} failed",
            stats.total, stats.succeeded, stats.failed
        );
        Ok(stats)
    }
}
