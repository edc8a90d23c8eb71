//! Run configuration.
//!
//! Built once at startup from CLI arguments and passed to every task as
//! shared read-only data. There is no ambient global state.

mod options;

pub use options::{keys, DecompilerOptions, OptionsBuilder};

use std::path::PathBuf;

/// Immutable configuration for one orchestration run.
#[derive(Debug, Clone)]
pub struct DecompilerConfig {
    /// Input: a directory, an archive, or a single `.class` file.
    pub input_path: PathBuf,
    /// Root directory decompiled sources are written under.
    pub output_path: PathBuf,
    /// Worker pool size. Always positive after building.
    pub thread_count: usize,
    /// Delete each class file after its decompilation is verified.
    pub delete_class_files: bool,
    /// Path to the Vineflower jar the external adapter invokes.
    pub decompiler_jar: PathBuf,
    /// Explicit java launcher; discovered via PATH when unset.
    pub java_path: Option<PathBuf>,
}

impl DecompilerConfig {
    pub fn builder() -> DecompilerConfigBuilder {
        DecompilerConfigBuilder::default()
    }
}

/// Builder for [`DecompilerConfig`].
#[derive(Debug, Default)]
pub struct DecompilerConfigBuilder {
    input_path: PathBuf,
    output_path: PathBuf,
    thread_count: usize,
    delete_class_files: bool,
    decompiler_jar: PathBuf,
    java_path: Option<PathBuf>,
}

impl DecompilerConfigBuilder {
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Worker pool size; zero means "use all available cores".
    pub fn thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn delete_class_files(mut self, delete: bool) -> Self {
        self.delete_class_files = delete;
        self
    }

    pub fn decompiler_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.decompiler_jar = path.into();
        self
    }

    pub fn java_path(mut self, path: Option<PathBuf>) -> Self {
        self.java_path = path;
        self
    }

    pub fn build(self) -> DecompilerConfig {
        let thread_count = if self.thread_count == 0 {
            num_cpus::get()
        } else {
            self.thread_count
        };
        DecompilerConfig {
            input_path: self.input_path,
            output_path: self.output_path,
            thread_count,
            delete_class_files: self.delete_class_files,
            decompiler_jar: self.decompiler_jar,
            java_path: self.java_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threads_falls_back_to_cpu_count() {
        let config = DecompilerConfig::builder()
            .input_path("in")
            .output_path("out")
            .thread_count(0)
            .build();
        assert_eq!(config.thread_count, num_cpus::get());
        assert!(config.thread_count >= 1);
    }

    #[test]
    fn explicit_thread_count_is_kept() {
        let config = DecompilerConfig::builder().thread_count(3).build();
        assert_eq!(config.thread_count, 3);
    }

    #[test]
    fn delete_defaults_off() {
        let config = DecompilerConfig::builder().build();
        assert!(!config.delete_class_files);
    }
}
