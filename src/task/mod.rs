//! Per-unit orchestration: one external-tool invocation, one result.

pub mod verify;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info, warn};

use crate::config::{DecompilerConfig, DecompilerOptions};
use crate::decompiler::Decompiler;
use crate::model::{DecompileJob, DecompileResult};
use verify::{DirSnapshot, NameCandidates, Verdict};

/// Drives one decompiler invocation for one job and resolves the outcome via
/// the heuristic verifier.
///
/// `run` never panics and never propagates an error: every failure mode
/// terminates in a [`DecompileResult`] with `success = false` and a
/// descriptive message. There is no internal retry.
pub struct DecompileTask {
    job: DecompileJob,
    config: Arc<DecompilerConfig>,
    options: Arc<DecompilerOptions>,
    decompiler: Arc<dyn Decompiler>,
}

impl DecompileTask {
    pub fn new(
        job: DecompileJob,
        config: Arc<DecompilerConfig>,
        options: Arc<DecompilerOptions>,
        decompiler: Arc<dyn Decompiler>,
    ) -> Self {
        Self {
            job,
            config,
            options,
            decompiler,
        }
    }

    pub fn job(&self) -> &DecompileJob {
        &self.job
    }

    pub fn run(&self) -> DecompileResult {
        match self.try_run() {
            Ok(result) => result,
            Err(e) => {
                error!(
                    "decompilation failed for {}: {e:#}",
                    self.job.source_path.display()
                );
                DecompileResult::failed(self.job.clone(), format!("{e:#}"))
            }
        }
    }

    fn try_run(&self) -> Result<DecompileResult> {
        let source = &self.job.source_path;
        let dest = &self.job.dest_dir;

        std::fs::create_dir_all(dest)
            .with_context(|| format!("failed to create output directory {}", dest.display()))?;

        if !source.is_file() {
            bail!("source file missing or unreadable: {}", source.display());
        }
        // Readability probe; a file we cannot open would fail inside the tool
        // with a less useful message.
        std::fs::File::open(source)
            .with_context(|| format!("source file missing or unreadable: {}", source.display()))?;

        let names = NameCandidates::for_source(source);
        let before = DirSnapshot::capture(dest)?;

        debug!(
            "decompiling {} into {}",
            source.display(),
            dest.display()
        );
        info!("decompiling {}", self.job.source_name());
        self.decompiler.decompile(source, dest, &self.options)?;
        info!("decompiler finished for {}", self.job.source_name());

        let after = DirSnapshot::capture(dest)?;
        match verify::resolve_output(&before, &after, &names) {
            Verdict::Matched(artifact) => {
                info!("source generated: {}", artifact.display());
                self.delete_source_if_configured(source);
                Ok(DecompileResult::ok(self.job.clone(), dest))
            }
            Verdict::AssumedNewOutput => {
                info!(
                    "new output appeared for {} without a name match, assuming success",
                    self.job.source_name()
                );
                self.delete_source_if_configured(source);
                Ok(DecompileResult::ok(self.job.clone(), dest))
            }
            Verdict::NoOutput => {
                warn!(
                    "no output produced for {} in {}",
                    self.job.source_name(),
                    dest.display()
                );
                Ok(DecompileResult::failed_at(
                    self.job.clone(),
                    "no output produced",
                    dest,
                ))
            }
        }
    }

    /// Delete the class file, only ever called after a positive verdict.
    fn delete_source_if_configured(&self, source: &Path) {
        if !self.config.delete_class_files {
            return;
        }
        match std::fs::remove_file(source) {
            Ok(()) => debug!("deleted class file {}", source.display()),
            Err(e) => warn!("failed to delete class file {}: {e}", source.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct WritingDecompiler {
        /// File name to write into the destination, None writes nothing.
        output_name: Option<String>,
    }

    impl Decompiler for WritingDecompiler {
        fn decompile(
            &self,
            _source: &Path,
            dest_dir: &Path,
            _options: &DecompilerOptions,
        ) -> Result<()> {
            if let Some(name) = &self.output_name {
                fs::write(dest_dir.join(name), "class X {}")?;
            }
            Ok(())
        }
    }

    struct FailingDecompiler;

    impl Decompiler for FailingDecompiler {
        fn decompile(&self, _: &Path, _: &Path, _: &DecompilerOptions) -> Result<()> {
            bail!("corrupt constant pool")
        }
    }

    struct Fixture {
        _dir: TempDir,
        source: PathBuf,
        dest: PathBuf,
        config: Arc<DecompilerConfig>,
        options: Arc<DecompilerOptions>,
    }

    fn fixture(class_name: &str, delete: bool) -> Fixture {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join(class_name);
        fs::write(&source, b"\xca\xfe\xba\xbe").unwrap();
        let dest = dir.path().join("out");
        let config = Arc::new(
            DecompilerConfig::builder()
                .input_path(dir.path())
                .output_path(&dest)
                .thread_count(1)
                .delete_class_files(delete)
                .build(),
        );
        Fixture {
            _dir: dir,
            source,
            dest,
            config,
            options: Arc::new(DecompilerOptions::built_in()),
        }
    }

    fn task(fx: &Fixture, decompiler: Arc<dyn Decompiler>) -> DecompileTask {
        DecompileTask::new(
            DecompileJob::new(&fx.source, &fx.dest),
            fx.config.clone(),
            fx.options.clone(),
            decompiler,
        )
    }

    #[test]
    fn successful_unit_resolves_to_destination_dir() {
        let fx = fixture("Foo.class", false);
        let result = task(
            &fx,
            Arc::new(WritingDecompiler {
                output_name: Some("Foo.java".into()),
            }),
        )
        .run();
        assert!(result.success);
        assert_eq!(result.output_path.as_deref(), Some(fx.dest.as_path()));
        assert!(result.error.is_none());
    }

    #[test]
    fn numeric_suffix_quirk_is_recognized() {
        // Bar_3.class comes out as Bar.java; normalization must still match.
        let fx = fixture("Bar_3.class", false);
        let result = task(
            &fx,
            Arc::new(WritingDecompiler {
                output_name: Some("Bar.java".into()),
            }),
        )
        .run();
        assert!(result.success);
    }

    #[test]
    fn tool_error_becomes_failed_result_and_source_survives() {
        let fx = fixture("Baz.class", true);
        let result = task(&fx, Arc::new(FailingDecompiler)).run();
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("corrupt constant pool"));
        assert!(fx.source.exists(), "failure must never delete the source");
    }

    #[test]
    fn no_output_is_a_failed_result() {
        let fx = fixture("Foo.class", true);
        let result = task(&fx, Arc::new(WritingDecompiler { output_name: None })).run();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("no output produced"));
        assert_eq!(result.output_path.as_deref(), Some(fx.dest.as_path()));
        assert!(fx.source.exists());
    }

    #[test]
    fn missing_source_fails_before_invocation() {
        let fx = fixture("Foo.class", false);
        fs::remove_file(&fx.source).unwrap();
        let result = task(
            &fx,
            Arc::new(WritingDecompiler {
                output_name: Some("Foo.java".into()),
            }),
        )
        .run();
        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("missing or unreadable"));
    }

    #[test]
    fn deletion_happens_only_on_success_when_enabled() {
        let fx = fixture("Foo.class", true);
        let result = task(
            &fx,
            Arc::new(WritingDecompiler {
                output_name: Some("Foo.java".into()),
            }),
        )
        .run();
        assert!(result.success);
        assert!(!fx.source.exists(), "source deleted after verified success");
    }

    #[test]
    fn deletion_disabled_keeps_source_on_success() {
        let fx = fixture("Foo.class", false);
        let result = task(
            &fx,
            Arc::new(WritingDecompiler {
                output_name: Some("Foo.java".into()),
            }),
        )
        .run();
        assert!(result.success);
        assert!(fx.source.exists());
    }

    #[test]
    fn oddly_named_output_is_assumed_success() {
        let fx = fixture("Weird.class", false);
        let result = task(
            &fx,
            Arc::new(WritingDecompiler {
                output_name: Some("CompletelyUnrelated.java".into()),
            }),
        )
        .run();
        // "CompletelyUnrelated" neither equals nor contains "Weird"; the
        // any-new-output fallback still accepts it.
        assert!(result.success);
    }

    #[test]
    fn destination_directory_is_created_lazily() {
        let fx = fixture("Foo.class", false);
        assert!(!fx.dest.exists());
        let result = task(
            &fx,
            Arc::new(WritingDecompiler {
                output_name: Some("Foo.java".into()),
            }),
        )
        .run();
        assert!(result.success);
        assert!(fx.dest.is_dir());
    }
}
