//! Job assembly: turn the input path into a flat list of decompile jobs.
//!
//! Input is classified as a directory, an archive container, or a single
//! class file; anything else is rejected before any work is scheduled.
//! Archives are unpacked in parallel through the engine's fire-and-forget
//! variant. Loose class files are copied under the output root first, so the
//! decompiler never writes into the input tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use tracing::{info, warn};

use crate::archive;
use crate::config::DecompilerConfig;
use crate::engine::TaskManager;
use crate::model::DecompileJob;

/// Build the job list for the configured input.
///
/// Fails fast on a missing input or an unrecognized input kind; these are the
/// only errors of the orchestration that surface as hard failures.
pub fn assemble_jobs(config: &DecompilerConfig, engine: &TaskManager) -> Result<Vec<DecompileJob>> {
    let input = &config.input_path;
    if !input.exists() {
        bail!("input path does not exist: {}", input.display());
    }
    if input.is_dir() {
        jobs_from_directory(input, &config.output_path, engine)
    } else if archive::is_archive_file(input) {
        jobs_from_archive(input, &config.output_path)
    } else if is_class_file(input) {
        jobs_from_class_file(input, &config.output_path)
    } else {
        bail!(
            "input must be a .class file, an archive (.jar/.war/.ear/.aar) or a directory: {}",
            input.display()
        );
    }
}

fn is_class_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("class"))
            .unwrap_or(false)
}

/// Stem an archive name for its extraction directory.
fn archive_dir_name(archive_path: &Path) -> String {
    archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string())
}

/// Walk a tree collecting every `.class` file under it.
fn collect_class_files(root: &Path) -> Vec<PathBuf> {
    let mut classes = Vec::new();
    // Standard filters off: hidden files and ignore files are irrelevant for
    // extracted bytecode trees.
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().map_or(false, |ft| ft.is_file())
                    && is_class_file(entry.path())
                {
                    classes.push(entry.path().to_path_buf());
                }
            }
            Err(e) => warn!("walk error: {e}"),
        }
    }
    classes
}

/// Directory input: unpack every archive found in the tree (in parallel) and
/// copy every loose class file under the output root, preserving relative
/// paths.
fn jobs_from_directory(
    dir: &Path,
    output: &Path,
    engine: &TaskManager,
) -> Result<Vec<DecompileJob>> {
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    info!("processing directory {}", dir.display());

    let mut archives = Vec::new();
    let mut classes = Vec::new();
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .build();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                    continue;
                }
                let path = entry.path();
                if archive::is_archive_file(path) {
                    archives.push(path.to_path_buf());
                } else if is_class_file(path) {
                    classes.push(path.to_path_buf());
                }
            }
            Err(e) => warn!("walk error: {e}"),
        }
    }

    info!(
        "found {} archives and {} class files",
        archives.len(),
        classes.len()
    );

    // Unpack all archives in parallel. Extraction targets are derived up
    // front; afterwards only the directories that materialized are walked, so
    // a failed extraction costs its own archive and nothing else.
    let extract_dirs: Vec<(PathBuf, PathBuf)> = archives
        .into_iter()
        .map(|a| {
            let target = output.join(archive_dir_name(&a));
            (a, target)
        })
        .collect();
    let ops: Vec<Box<dyn FnOnce() -> Result<()> + Send>> = extract_dirs
        .iter()
        .map(|(archive_path, target)| {
            let archive_path = archive_path.clone();
            let target = target.clone();
            Box::new(move || archive::extract_archive(&archive_path, &target))
                as Box<dyn FnOnce() -> Result<()> + Send>
        })
        .collect();
    engine.execute_and_wait(ops);

    let mut jobs = Vec::new();

    // Loose class files are copied under the output root so decompilation
    // writes next to the copy, never into the input tree.
    for class in &classes {
        let relative = class
            .strip_prefix(dir)
            .with_context(|| format!("class file outside input root: {}", class.display()))?;
        let target_dir = match relative.parent() {
            Some(parent) => output.join(parent),
            None => output.to_path_buf(),
        };
        fs::create_dir_all(&target_dir)
            .with_context(|| format!("failed to create directory {}", target_dir.display()))?;
        let file_name = class
            .file_name()
            .with_context(|| format!("class file has no name: {}", class.display()))?;
        let target = target_dir.join(file_name);
        fs::copy(class, &target)
            .with_context(|| format!("failed to copy {}", class.display()))?;
        jobs.push(DecompileJob::new(target, target_dir).with_relative_path(relative));
    }

    // Classes unpacked from archives decompile in place.
    for (archive_path, target) in &extract_dirs {
        if !target.is_dir() {
            continue;
        }
        let unpacked = collect_class_files(target);
        info!(
            "unpacked {} class files from {}",
            unpacked.len(),
            archive_path.display()
        );
        jobs.extend(jobs_for_unpacked_classes(unpacked));
    }

    info!("prepared {} decompile jobs", jobs.len());
    Ok(jobs)
}

/// Single-archive input: unpack into `<output>/<archive-stem>/` and
/// decompile the classes in place.
fn jobs_from_archive(archive_path: &Path, output: &Path) -> Result<Vec<DecompileJob>> {
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let target = output.join(archive_dir_name(archive_path));
    archive::extract_archive(archive_path, &target)?;

    let unpacked = if target.is_dir() {
        collect_class_files(&target)
    } else {
        Vec::new()
    };
    info!(
        "unpacked {} class files from {}",
        unpacked.len(),
        archive_path.display()
    );
    Ok(jobs_for_unpacked_classes(unpacked))
}

/// Single-class input: copy into the output root and emit one job.
fn jobs_from_class_file(class: &Path, output: &Path) -> Result<Vec<DecompileJob>> {
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let file_name = class
        .file_name()
        .with_context(|| format!("class file has no name: {}", class.display()))?;
    let target = output.join(file_name);
    fs::copy(class, &target).with_context(|| format!("failed to copy {}", class.display()))?;

    Ok(vec![DecompileJob::new(target, output)])
}

fn jobs_for_unpacked_classes(classes: Vec<PathBuf>) -> Vec<DecompileJob> {
    classes
        .into_iter()
        .filter_map(|class| {
            let dest = class.parent()?.to_path_buf();
            Some(DecompileJob::new(class, dest))
        })
        .collect()
}
