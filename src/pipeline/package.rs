//! Artifact packaging
//!
//! A job ends with one or many named output files. One file is delivered
//! as-is; many are bundled into a deflate-compressed zip with a fixed,
//! operation-specific name, each artifact stored under its display name.

use crate::error::AppError;
use crate::pipeline::staging::StagingArea;
use std::fs::File;
use std::path::PathBuf;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of packaged archives
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// One output file produced by a job step
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Location inside the staging area
    pub path: PathBuf,
    /// Display name used for downloads and archive entries
    pub name: String,
    /// MIME type of the file content
    pub content_type: &'static str,
}

impl Artifact {
    /// Convenience constructor for a PDF artifact
    pub fn pdf(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
            content_type: "application/pdf",
        }
    }
}

/// The single file handed to the transport layer
#[derive(Debug)]
pub struct Deliverable {
    /// Location inside the staging area
    pub path: PathBuf,
    /// Download filename
    pub name: String,
    /// MIME type of the response body
    pub content_type: &'static str,
}

/// Reduce a job's artifacts to one deliverable.
///
/// Exactly one artifact passes through unchanged. More than one are written
/// into `<area>/<archive_name>`; the archive name is deterministic per
/// operation family, never randomized. An empty artifact set is a failure —
/// the job produced no valid output.
pub fn package(
    area: &StagingArea,
    archive_name: &str,
    mut artifacts: Vec<Artifact>,
) -> Result<Deliverable, AppError> {
    match artifacts.len() {
        0 => Err(AppError::Packaging("no valid output produced".to_string())),
        1 => {
            let artifact = artifacts.remove(0);
            Ok(Deliverable {
                path: artifact.path,
                name: artifact.name,
                content_type: artifact.content_type,
            })
        }
        n => {
            let zip_path = area.path().join(archive_name);
            build_zip(&zip_path, &artifacts)?;
            debug!(archive = %zip_path.display(), entries = n, "Artifacts packaged");
            Ok(Deliverable {
                path: zip_path,
                name: archive_name.to_string(),
                content_type: ZIP_CONTENT_TYPE,
            })
        }
    }
}

fn build_zip(zip_path: &std::path::Path, artifacts: &[Artifact]) -> Result<(), AppError> {
    let file = File::create(zip_path)
        .map_err(|e| AppError::Resource(format!("cannot create archive: {}", e)))?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for artifact in artifacts {
        writer
            .start_file(artifact.name.as_str(), options)
            .map_err(|e| AppError::Resource(format!("cannot add archive entry: {}", e)))?;
        let mut source = File::open(&artifact.path)
            .map_err(|e| AppError::Resource(format!("cannot read artifact: {}", e)))?;
        std::io::copy(&mut source, &mut writer)
            .map_err(|e| AppError::Resource(format!("cannot write archive entry: {}", e)))?;
    }

    writer
        .finish()
        .map_err(|e| AppError::Resource(format!("cannot finalize archive: {}", e)))?;
    Ok(())
}
