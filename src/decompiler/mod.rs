//! Adapter boundary to the external decompiler.
//!
//! Nothing outside this module knows the tool's invocation shape. The rest of
//! the crate talks to the [`Decompiler`] trait and infers success from the
//! filesystem (see [`crate::task::verify`]); a clean exit here does not mean
//! output was produced.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::config::{DecompilerConfig, DecompilerOptions};

/// The seam to the external transformation tool: decompile one source unit
/// into a destination directory with the given option map. May fail; writing
/// nothing while exiting cleanly is not a failure at this boundary.
pub trait Decompiler: Send + Sync {
    fn decompile(&self, source: &Path, dest_dir: &Path, options: &DecompilerOptions)
        -> Result<()>;
}

/// Concrete binding to the Vineflower jar, invoked through the java launcher.
#[derive(Debug)]
pub struct ExternalDecompiler {
    java: PathBuf,
    jar: PathBuf,
}

impl ExternalDecompiler {
    /// Locate the java launcher (explicit path or PATH lookup) and validate
    /// the decompiler jar.
    pub fn new(config: &DecompilerConfig) -> Result<Self> {
        let java = match &config.java_path {
            Some(path) => {
                if !path.exists() {
                    bail!("java launcher not found at {}", path.display());
                }
                path.clone()
            }
            None => which::which("java").context("java launcher not found on PATH")?,
        };
        if !config.decompiler_jar.is_file() {
            bail!(
                "decompiler jar not found: {}",
                config.decompiler_jar.display()
            );
        }
        Ok(Self {
            java,
            jar: config.decompiler_jar.clone(),
        })
    }
}

impl Decompiler for ExternalDecompiler {
    fn decompile(
        &self,
        source: &Path,
        dest_dir: &Path,
        options: &DecompilerOptions,
    ) -> Result<()> {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-jar").arg(&self.jar);
        for (key, value) in options.iter() {
            cmd.arg(format!("-{key}={value}"));
        }
        cmd.arg(source).arg(dest_dir);
        // The tool's stdout is progress chatter; outcome detection is
        // filesystem-based, so it is discarded. Stderr is kept for the error
        // message when the process fails outright.
        cmd.stdout(Stdio::null());

        debug!("invoking decompiler: {cmd:?}");
        let output = cmd
            .output()
            .with_context(|| format!("failed to launch {}", self.java.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                bail!("decompiler exited with {}", output.status);
            }
            bail!("decompiler exited with {}: {stderr}", output.status);
        }
        Ok(())
    }
}
