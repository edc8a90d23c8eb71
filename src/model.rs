//! Core data model: one job per class file, one result per job.

use std::path::{Path, PathBuf};

/// A single unit of decompilation work.
///
/// Immutable once created: pairs one `.class` file with the directory the
/// decompiled source should land in. The destination directory does not need
/// to exist yet; the task creates it lazily.
#[derive(Debug, Clone)]
pub struct DecompileJob {
    /// The class file to decompile.
    pub source_path: PathBuf,
    /// Directory the decompiler writes into.
    pub dest_dir: PathBuf,
    /// Path of the unit relative to the input root, when it came from a
    /// directory walk. Informational only.
    pub relative_path: Option<PathBuf>,
}

impl DecompileJob {
    pub fn new(source_path: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            dest_dir: dest_dir.into(),
            relative_path: None,
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<PathBuf>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    /// File name of the source unit, for log messages.
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Terminal outcome of processing one [`DecompileJob`].
///
/// Every failure mode, whether the tool errored, the source was missing, or
/// the output verifier found nothing, is folded into `success = false` with a
/// descriptive message. Tasks never propagate errors past this type.
#[derive(Debug, Clone)]
pub struct DecompileResult {
    pub job: DecompileJob,
    pub success: bool,
    pub error: Option<String>,
    /// Where output ended up, when known. Set to the destination directory on
    /// success; also set on a verification miss (the directory exists, it is
    /// just empty of anything attributable to this unit).
    pub output_path: Option<PathBuf>,
}

impl DecompileResult {
    pub fn ok(job: DecompileJob, output_path: impl Into<PathBuf>) -> Self {
        Self {
            job,
            success: true,
            error: None,
            output_path: Some(output_path.into()),
        }
    }

    pub fn failed(job: DecompileJob, error: impl Into<String>) -> Self {
        Self {
            job,
            success: false,
            error: Some(error.into()),
            output_path: None,
        }
    }

    pub fn failed_at(job: DecompileJob, error: impl Into<String>, output_path: &Path) -> Self {
        Self {
            job,
            success: false,
            error: Some(error.into()),
            output_path: Some(output_path.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_name_uses_file_name() {
        let job = DecompileJob::new("/tmp/in/Foo.class", "/tmp/out");
        assert_eq!(job.source_name(), "Foo.class");
    }

    #[test]
    fn failed_result_has_no_output_path() {
        let job = DecompileJob::new("Foo.class", "out");
        let result = DecompileResult::failed(job, "boom");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.output_path.is_none());
    }
}
