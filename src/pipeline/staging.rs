//! Per-request staging areas
//!
//! A staging area is a uniquely named directory owned by exactly one
//! request. Uploads are copied into it under collision-free names, every
//! intermediate and final output lives inside it, and the whole directory
//! is removed when the request finishes — on success, failure, or panic.

use crate::error::AppError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// An exclusively owned, uniquely named filesystem scope for one request
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
    created_at: SystemTime,
}

impl StagingArea {
    /// Create a fresh staging area under `base`, named `<prefix>_<uuid>`
    pub async fn create(base: &Path, prefix: &str) -> Result<Self, AppError> {
        let root = base.join(format!("{}_{}", prefix, Uuid::new_v4().simple()));
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Resource(format!("cannot create staging area {}: {}", root.display(), e))
        })?;
        debug!(area = %root.display(), "Staging area created");
        Ok(Self {
            root,
            created_at: SystemTime::now(),
        })
    }

    /// Root directory of this area
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Copy an upload's bytes into the area under a collision-free name.
    ///
    /// The client-supplied name is reduced to its final path component, so
    /// uploads cannot escape the area. If the name is already taken, `_1`,
    /// `_2`, … are appended before the extension; an existing staged file is
    /// never overwritten.
    pub async fn stage_input(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        let safe_name = Path::new(original_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "upload.bin".to_string());

        let dest = self.collision_free(&safe_name).await?;
        fs::write(&dest, bytes).await.map_err(|e| {
            AppError::Resource(format!("cannot stage upload {}: {}", dest.display(), e))
        })?;
        debug!(staged = %dest.display(), size = bytes.len(), "Upload staged");
        Ok(dest)
    }

    /// Pick a collision-free path for an operation's output file.
    ///
    /// Uses the same suffixing rule as staged inputs, probed against
    /// whatever already exists in the area, so an external tool never
    /// writes onto one of its own inputs (e.g. an upload literally named
    /// `compressed.pdf`). The file itself is not created here; the
    /// producing step writes it, and the deliverable keeps its display
    /// name regardless of the suffix.
    pub async fn reserve_output(&self, name: &str) -> Result<PathBuf, AppError> {
        self.collision_free(name).await
    }

    async fn collision_free(&self, name: &str) -> Result<PathBuf, AppError> {
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), Some(ext.to_string())),
            _ => (name.to_string(), None),
        };

        let mut dest = self.root.join(name);
        let mut counter = 0u32;
        while path_exists(&dest).await? {
            counter += 1;
            let candidate = match &ext {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            };
            dest = self.root.join(candidate);
        }
        Ok(dest)
    }

    /// Recursively remove the area.
    ///
    /// Best-effort and silent: a failed removal is logged but never surfaces
    /// to the caller, and calling this on an already-removed area is a no-op.
    pub fn destroy(&self) {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {
                let age_ms = self
                    .created_at
                    .elapsed()
                    .map(|age| age.as_millis() as u64)
                    .unwrap_or_default();
                debug!(area = %self.root.display(), age_ms, "Staging area removed");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(area = %self.root.display(), error = %e, "Failed to remove staging area");
            }
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        self.destroy();
    }
}

async fn path_exists(path: &Path) -> Result<bool, AppError> {
    fs::try_exists(path)
        .await
        .map_err(|e| AppError::Resource(format!("cannot probe {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn staged_inputs_get_collision_suffixes() {
        let base = tempfile::tempdir().unwrap();
        let area = StagingArea::create(base.path(), "test").await.unwrap();

        let first = area.stage_input("doc.pdf", b"one").await.unwrap();
        let second = area.stage_input("doc.pdf", b"two").await.unwrap();
        let third = area.stage_input("doc.pdf", b"three").await.unwrap();

        assert_eq!(first.file_name().unwrap(), "doc.pdf");
        assert_eq!(second.file_name().unwrap(), "doc_1.pdf");
        assert_eq!(third.file_name().unwrap(), "doc_2.pdf");
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[tokio::test]
    async fn suffix_goes_before_the_extension_only_when_there_is_one() {
        let base = tempfile::tempdir().unwrap();
        let area = StagingArea::create(base.path(), "test").await.unwrap();

        area.stage_input("notes", b"a").await.unwrap();
        let second = area.stage_input("notes", b"b").await.unwrap();

        assert_eq!(second.file_name().unwrap(), "notes_1");
    }

    #[tokio::test]
    async fn reserved_outputs_avoid_staged_inputs() {
        let base = tempfile::tempdir().unwrap();
        let area = StagingArea::create(base.path(), "test").await.unwrap();
        area.stage_input("compressed.pdf", b"%PDF input").await.unwrap();

        let reserved = area.reserve_output("compressed.pdf").await.unwrap();

        assert_eq!(reserved.file_name().unwrap(), "compressed_1.pdf");
        assert!(
            !reserved.exists(),
            "reservation must not create the file itself"
        );
        // the staged input is untouched
        assert_eq!(
            std::fs::read(area.path().join("compressed.pdf")).unwrap(),
            b"%PDF input"
        );
    }

    #[tokio::test]
    async fn reserving_in_an_empty_area_keeps_the_plain_name() {
        let base = tempfile::tempdir().unwrap();
        let area = StagingArea::create(base.path(), "test").await.unwrap();

        let reserved = area.reserve_output("protected.pdf").await.unwrap();

        assert_eq!(reserved.file_name().unwrap(), "protected.pdf");
    }

    #[tokio::test]
    async fn client_paths_are_reduced_to_file_names() {
        let base = tempfile::tempdir().unwrap();
        let area = StagingArea::create(base.path(), "test").await.unwrap();

        let staged = area.stage_input("../../etc/passwd", b"x").await.unwrap();

        assert_eq!(staged.parent().unwrap(), area.path());
        assert_eq!(staged.file_name().unwrap(), "passwd");
    }

    #[tokio::test]
    async fn destroy_is_idempotent_and_silent() {
        let base = tempfile::tempdir().unwrap();
        let area = StagingArea::create(base.path(), "test").await.unwrap();
        area.stage_input("doc.pdf", b"x").await.unwrap();
        let root = area.path().to_path_buf();

        area.destroy();
        assert!(!root.exists());
        area.destroy(); // second call must not panic or error
    }

    #[tokio::test]
    async fn dropping_the_area_removes_it() {
        let base = tempfile::tempdir().unwrap();
        let root = {
            let area = StagingArea::create(base.path(), "test").await.unwrap();
            area.stage_input("doc.pdf", b"x").await.unwrap();
            area.path().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn areas_are_unique_per_request() {
        let base = tempfile::tempdir().unwrap();
        let a = StagingArea::create(base.path(), "merge").await.unwrap();
        let b = StagingArea::create(base.path(), "merge").await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
