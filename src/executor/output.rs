//! Locating files produced by external tools
//!
//! Tools signal success through their exit status only; the produced file is
//! found either by a deterministic naming convention (same stem, new
//! extension) or by scanning the working area for an expected extension. A
//! zero exit with no output file is a distinct failure, never a silent
//! success.

use crate::executor::error::ToolError;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Verify that a tool produced the file it was expected to produce.
///
/// `file_name` is the deterministic output name (e.g. `report.pdf` for an
/// input `report.docx`). Returns the full path, or
/// [`ToolError::OutputMissing`] if the file is absent.
pub fn expect_output(dir: &Path, file_name: &str) -> Result<PathBuf, ToolError> {
    let path = dir.join(file_name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ToolError::OutputMissing(format!(
            "expected {} in working area",
            file_name
        )))
    }
}

/// Verify that a tool wrote the exact file it was pointed at.
///
/// Counterpart of [`expect_output`] for operations that hand the tool a
/// pre-reserved output path instead of relying on a naming convention.
pub fn expect_output_at(path: PathBuf) -> Result<PathBuf, ToolError> {
    if path.is_file() {
        Ok(path)
    } else {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Err(ToolError::OutputMissing(format!(
            "expected {} in working area",
            name
        )))
    }
}

/// Scan the working area for a file with the given extension.
///
/// When several files match, the lexicographically first one is returned and
/// the ambiguity is logged; tools under our contracts emit a single output,
/// so more than one candidate means a tool misbehaved in a way we tolerate
/// deterministically.
pub fn find_output_by_ext(dir: &Path, ext: &str) -> Result<PathBuf, ToolError> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| ToolError::OutputMissing(format!("cannot scan working area: {}", e)))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case(ext))
                    .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    if candidates.len() > 1 {
        warn!(
            ext = ext,
            candidates = ?candidates,
            "Multiple tool outputs match extension; taking the first"
        );
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ToolError::OutputMissing(format!("no .{} file in working area", ext)))
}
