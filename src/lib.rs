//! # declassify - bulk Java decompilation orchestrator
//!
//! Drives an external decompiler (Vineflower) across directories, archive
//! containers and single class files with a bounded worker pool, and infers
//! per-unit success from filesystem state because the tool itself gives no
//! reliable machine-readable success signal.
//!
//! ## Quick start
//!
//! ```bash
//! # Decompile every class in a jar
//! declassify app.jar -o sources --decompiler-jar vineflower.jar
//!
//! # Decompile a whole directory tree with 8 workers
//! declassify build/ -o sources -j 8
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod decompiler;
pub mod discover;
pub mod engine;
pub mod model;
pub mod orchestrator;
pub mod task;

pub use cli::{Cli, Output};
pub use config::{DecompilerConfig, DecompilerOptions};
pub use model::{DecompileJob, DecompileResult};

/// Result type alias for declassify operations.
pub type Result<T> = anyhow::Result<T>;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
