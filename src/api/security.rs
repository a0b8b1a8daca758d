//! Password protection endpoints
//!
//! Both operations shell out to qpdf. The same password is used for the
//! user and owner secrets at a fixed 128-bit key length, and neither run is
//! bounded by a timeout — qpdf works proportionally to document size and is
//! trusted to terminate.

use crate::config::Config;
use crate::error::AppError;
use crate::executor::{expect_output_at, invoke, ToolCommand};
use crate::pipeline::{Artifact, Job};
use axum::extract::{Multipart, State};
use axum::response::Response;
use std::sync::Arc;

/// `POST /security/protect` — encrypt the uploaded PDF with a password
pub async fn protect(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "protect").await?;
    let form = job.stage(multipart).await?;
    let input = form.single_file()?;
    let password = form.required_field("password")?;

    let out_path = job.area().reserve_output("protected.pdf").await?;
    let command = ToolCommand::new(&config.tools.qpdf_bin)
        .arg("--encrypt")
        .arg(password)
        .arg(password)
        .arg("128")
        .arg("--")
        .arg(input.path.display().to_string())
        .arg(out_path.display().to_string());
    invoke(&command, job.dir(), None).await?;

    let out_path = expect_output_at(out_path)?;
    job.deliver(
        "protected.zip",
        vec![Artifact::pdf(out_path, "protected.pdf")],
    )
    .await
}

/// `POST /security/unlock` — decrypt the uploaded PDF with its password
pub async fn unlock(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "unlock").await?;
    let form = job.stage(multipart).await?;
    let input = form.single_file()?;
    let password = form.required_field("password")?;

    let out_path = job.area().reserve_output("unlocked.pdf").await?;
    let command = ToolCommand::new(&config.tools.qpdf_bin)
        .arg(format!("--password={}", password))
        .arg("--decrypt")
        .arg(input.path.display().to_string())
        .arg(out_path.display().to_string());
    invoke(&command, job.dir(), None).await?;

    let out_path = expect_output_at(out_path)?;
    job.deliver("unlocked.zip", vec![Artifact::pdf(out_path, "unlocked.pdf")])
        .await
}
