//! Job lifecycle
//!
//! A `Job` walks one request through staging → executing → packaging →
//! delivering → cleanup. The job owns its staging area, so an error at any
//! phase (or a panic) releases it via `Drop`; on success it is destroyed
//! explicitly, but only after the deliverable's bytes have been read fully
//! into memory.

use crate::config::Config;
use crate::error::AppError;
use crate::pipeline::package::{package, Artifact};
use crate::pipeline::staging::StagingArea;
use axum::extract::Multipart;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// One file staged from the multipart form
#[derive(Debug)]
pub struct StagedFile {
    /// Collision-free path inside the staging area
    pub path: PathBuf,
    /// Staged file name (the upload's name, possibly suffixed)
    pub name: String,
}

/// The staged contents of a multipart form: uploads plus text fields
#[derive(Debug, Default)]
pub struct StagedForm {
    /// Uploaded files, in form order
    pub files: Vec<StagedFile>,
    /// Text fields (e.g. `password`, `pages`) keyed by field name
    pub fields: HashMap<String, String>,
}

impl StagedForm {
    /// The single upload this operation expects
    pub fn single_file(&self) -> Result<&StagedFile, AppError> {
        match self.files.as_slice() {
            [file] => Ok(file),
            [] => Err(AppError::BadRequest("no file uploaded".to_string())),
            _ => Err(AppError::BadRequest(
                "expected exactly one file upload".to_string(),
            )),
        }
    }

    /// A required text field
    pub fn required_field(&self, name: &str) -> Result<&str, AppError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::BadRequest(format!("missing '{}' form field", name)))
    }
}

/// A request-scoped conversion job
pub struct Job {
    area: StagingArea,
    operation: &'static str,
}

impl Job {
    /// Begin a job: allocate its staging area
    pub async fn begin(config: &Config, operation: &'static str) -> Result<Self, AppError> {
        let area = StagingArea::create(&config.staging.base_dir, operation).await?;
        Ok(Self { area, operation })
    }

    /// The job's staging area
    pub fn area(&self) -> &StagingArea {
        &self.area
    }

    /// The staging area's root directory
    pub fn dir(&self) -> &Path {
        self.area.path()
    }

    /// Stage every part of the multipart form into the area.
    ///
    /// Parts with a filename become staged files; parts without become text
    /// fields. Each upload is read fully before the next one is touched.
    pub async fn stage(&self, mut multipart: Multipart) -> Result<StagedForm, AppError> {
        let mut form = StagedForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid multipart stream: {}", e)))?
        {
            let field_name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name().map(|s| s.to_string()) {
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read upload '{}': {}", field_name, e))
                })?;
                let path = self.area.stage_input(&file_name, &bytes).await?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(file_name);
                form.files.push(StagedFile { path, name });
            } else {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read field '{}': {}", field_name, e))
                })?;
                form.fields.insert(field_name, value);
            }
        }

        Ok(form)
    }

    /// Package the artifacts and turn them into the HTTP response.
    ///
    /// The deliverable's bytes are read into memory while its file still
    /// exists; only then is the staging area destroyed, so nothing of the
    /// request survives the response. `archive_name` is used only when more
    /// than one artifact needs bundling.
    pub async fn deliver(
        self,
        archive_name: &str,
        artifacts: Vec<Artifact>,
    ) -> Result<Response, AppError> {
        let deliverable = package(&self.area, archive_name, artifacts)?;
        let bytes = tokio::fs::read(&deliverable.path).await.map_err(|e| {
            AppError::Resource(format!(
                "cannot read deliverable {}: {}",
                deliverable.path.display(),
                e
            ))
        })?;
        self.area.destroy();

        info!(
            operation = self.operation,
            name = %deliverable.name,
            size = bytes.len(),
            "Job delivered"
        );

        let headers = [
            (header::CONTENT_TYPE, deliverable.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", deliverable.name),
            ),
        ];
        Ok((headers, bytes).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base: &Path) -> Config {
        let mut config = Config::from_env();
        config.staging.base_dir = base.to_path_buf();
        config
    }

    #[tokio::test]
    async fn deliver_reads_bytes_then_destroys_the_area() {
        let base = tempfile::tempdir().unwrap();
        let job = Job::begin(&test_config(base.path()), "test").await.unwrap();
        let root = job.dir().to_path_buf();
        let out = root.join("out.pdf");
        std::fs::write(&out, b"%PDF-1.5 payload").unwrap();

        let response = job
            .deliver("unused.zip", vec![Artifact::pdf(out, "out.pdf")])
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(content_type, "application/pdf");
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.contains("out.pdf"));
        assert!(!root.exists(), "staging area must be gone after delivery");
    }

    #[tokio::test]
    async fn failed_delivery_still_cleans_up() {
        let base = tempfile::tempdir().unwrap();
        let job = Job::begin(&test_config(base.path()), "test").await.unwrap();
        let root = job.dir().to_path_buf();

        let result = job.deliver("unused.zip", Vec::new()).await;

        assert!(matches!(result, Err(AppError::Packaging(_))));
        assert!(!root.exists(), "staging area must be gone after failure");
    }

    #[tokio::test]
    async fn job_drop_cleans_up_mid_pipeline() {
        let base = tempfile::tempdir().unwrap();
        let root = {
            let job = Job::begin(&test_config(base.path()), "test").await.unwrap();
            job.dir().to_path_buf()
            // job dropped here, as if an operation failed before delivery
        };
        assert!(!root.exists());
    }
}
