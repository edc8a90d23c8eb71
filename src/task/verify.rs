//! Heuristic outcome verification.
//!
//! The external decompiler gives no reliable machine-readable success signal:
//! it can exit cleanly without writing anything (malformed bytecode), or
//! write under an unexpected name (internal renaming of synthetic classes).
//! Success is therefore inferred from filesystem state: a snapshot of the
//! destination directory is taken before and after the invocation, and an
//! ordered cascade of match rules reconciles the two.
//!
//! The cascade deliberately prefers false positives over false negatives:
//! discarding genuinely produced output is worse than accepting ambiguous
//! output, because the destructive action (source deletion) only ever follows
//! a positive verdict, and a negative verdict leaves the source untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File extension (without dot) of qualifying output files.
pub const OUTPUT_EXTENSION: &str = "java";

/// Strip a trailing `_<digits>` suffix from a class base name.
///
/// The decompiler renames certain synthetic and inner units by appending a
/// numeric disambiguator, so `TextBuilder_3.class` can come out as
/// `TextBuilder.java`. A name without such a suffix is returned unchanged,
/// which makes the operation idempotent.
pub fn strip_numeric_suffix(name: &str) -> &str {
    if let Some(idx) = name.rfind('_') {
        let suffix = &name[idx + 1..];
        if idx > 0 && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            return &name[..idx];
        }
    }
    name
}

/// The names a produced source file may plausibly carry for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidates {
    /// Base name of the unit, extension stripped.
    pub literal: String,
    /// Literal name with any numeric `_<digits>` suffix removed.
    pub normalized: String,
    /// Literal name with the inner-class separator flattened (`$` -> `_`).
    pub inner_flattened: String,
}

impl NameCandidates {
    pub fn from_base_name(base_name: &str) -> Self {
        let literal = strip_class_extension(base_name);
        Self {
            literal: literal.to_string(),
            normalized: strip_numeric_suffix(literal).to_string(),
            inner_flattened: literal.replace('$', "_"),
        }
    }

    pub fn for_source(source: &Path) -> Self {
        let base_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_base_name(&base_name)
    }

    /// Fixed candidate output file names, most specific first.
    fn output_file_names(&self) -> [String; 3] {
        [
            format!("{}.{}", self.literal, OUTPUT_EXTENSION),
            format!("{}.{}", self.normalized, OUTPUT_EXTENSION),
            format!("{}.{}", self.inner_flattened, OUTPUT_EXTENSION),
        ]
    }
}

/// Drop a trailing `.class` (any case) from a file name. The stem must stay
/// non-empty, and the cut has to land on a char boundary for names with
/// non-ASCII identifiers.
fn strip_class_extension(name: &str) -> &str {
    let n = name.len();
    let ext_len = ".class".len();
    if n > ext_len && name.is_char_boundary(n - ext_len) && name[n - ext_len..].eq_ignore_ascii_case(".class") {
        &name[..n - ext_len]
    } else {
        name
    }
}

/// One qualifying output file observed in the destination directory.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub file_name: String,
    pub path: PathBuf,
    pub len: u64,
}

impl SnapshotEntry {
    fn stem(&self) -> &str {
        // file_name always carries the output extension; drop ".java".
        &self.file_name[..self.file_name.len() - OUTPUT_EXTENSION.len() - 1]
    }
}

/// Point-in-time listing of qualifying output files in one directory.
///
/// Ephemeral: captured immediately before and after a tool invocation,
/// compared, and discarded. Entries are sorted by file name so the "first
/// match" of the cascade is deterministic.
#[derive(Debug, Clone, Default)]
pub struct DirSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl DirSnapshot {
    pub fn capture(dir: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        let read_dir = std::fs::read_dir(dir)
            .with_context(|| format!("failed to list directory {}", dir.display()))?;
        for entry in read_dir {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !is_output_file_name(&file_name) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            entries.push(SnapshotEntry {
                file_name,
                path: entry.path(),
                len: metadata.len(),
            });
        }
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(Self { entries })
    }

    #[cfg(test)]
    pub fn from_entries(mut entries: Vec<SnapshotEntry>) -> Self {
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Self { entries }
    }

    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    fn find(&self, file_name: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.file_name == file_name)
    }
}

fn is_output_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.len() > OUTPUT_EXTENSION.len() + 1 && lower.ends_with(&format!(".{OUTPUT_EXTENSION}"))
}

/// Outcome of the reconciliation cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A concrete artifact was attributed to the unit.
    Matched(PathBuf),
    /// No name matched, but new qualifying output appeared; treated as
    /// success because the tool's naming for edge cases (non-ASCII
    /// identifiers, heavy renaming) is not fully predictable.
    AssumedNewOutput,
    /// Nothing attributable appeared.
    NoOutput,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        !matches!(self, Verdict::NoOutput)
    }
}

/// The ordered cascade, pure over the two snapshots and the candidate set.
/// Stops at the first rule that succeeds:
///
/// 1. output count increased and some file's stem equals, is prefixed by, or
///    contains the normalized name;
/// 2. a fixed candidate file name exists and is non-empty;
/// 3. output count increased at all (assume success on any new output);
/// 4. otherwise, no output.
pub fn resolve_output(
    before: &DirSnapshot,
    after: &DirSnapshot,
    names: &NameCandidates,
) -> Verdict {
    let grew = after.file_count() > before.file_count();

    if grew {
        let matched = after.entries.iter().find(|entry| {
            let stem = entry.stem();
            stem == names.normalized
                || stem.starts_with(&names.normalized)
                || stem.contains(&names.normalized)
        });
        if let Some(entry) = matched {
            return Verdict::Matched(entry.path.clone());
        }
    }

    for candidate in names.output_file_names() {
        if let Some(entry) = after.find(&candidate) {
            if entry.len > 0 {
                return Verdict::Matched(entry.path.clone());
            }
        }
    }

    if grew {
        return Verdict::AssumedNewOutput;
    }

    Verdict::NoOutput
}
