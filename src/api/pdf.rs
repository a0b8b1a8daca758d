//! PDF manipulation endpoints: merge, split, extract, compress

use crate::config::Config;
use crate::error::AppError;
use crate::executor::{expect_output_at, invoke, ToolCommand};
use crate::pages::{
    extract_pages, load_document, merge_documents, save_document, split_document,
};
use crate::pipeline::{Artifact, Job};
use axum::extract::{Multipart, State};
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;

/// `POST /pdf/merge` — concatenate the uploaded PDFs in upload order
pub async fn merge(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "merge").await?;
    let form = job.stage(multipart).await?;
    if form.files.is_empty() {
        return Err(AppError::BadRequest("no files uploaded".to_string()));
    }

    let documents = form
        .files
        .iter()
        .map(|file| load_document(&file.path))
        .collect::<Result<Vec<_>, _>>()?;
    let mut merged = merge_documents(documents)?;

    let out_path = job.dir().join("merged.pdf");
    save_document(&mut merged, &out_path)?;

    job.deliver("merged.zip", vec![Artifact::pdf(out_path, "merged.pdf")])
        .await
}

/// `POST /pdf/split` — one single-page PDF per page, zipped when plural
pub async fn split(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "split").await?;
    let form = job.stage(multipart).await?;
    let input = form.single_file()?;

    let document = load_document(&input.path)?;
    let mut artifacts = Vec::new();
    for (index, mut part) in split_document(&document)?.into_iter().enumerate() {
        let name = format!("page_{}.pdf", index + 1);
        let path = job.dir().join(&name);
        save_document(&mut part, &path)?;
        artifacts.push(Artifact::pdf(path, name));
    }

    job.deliver("split_pages.zip", artifacts).await
}

/// `POST /pdf/extract` — the pages named by the `pages` selector, in
/// selector order (duplicates included)
pub async fn extract(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "extract").await?;
    let form = job.stage(multipart).await?;
    let input = form.single_file()?;
    let selector = form.fields.get("pages").map(String::as_str).unwrap_or("1");

    let document = load_document(&input.path)?;
    let mut artifacts = Vec::new();
    for (page, mut part) in extract_pages(&document, selector)? {
        let name = format!("page_{}.pdf", page);
        let path = job.dir().join(&name);
        save_document(&mut part, &path)?;
        artifacts.push(Artifact::pdf(path, name));
    }

    job.deliver("extracted_pages.zip", artifacts).await
}

/// `POST /pdf/compress` — lossy recompression through Ghostscript's fixed
/// ebook preset
pub async fn compress(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "compress").await?;
    let form = job.stage(multipart).await?;
    let input = form.single_file()?;

    // Reserved, not joined: an upload literally named compressed.pdf must
    // not become Ghostscript's own output target.
    let out_path = job.area().reserve_output("compressed.pdf").await?;
    let command = ToolCommand::new(&config.tools.ghostscript_bin)
        .arg("-sDEVICE=pdfwrite")
        .arg("-dCompatibilityLevel=1.4")
        .arg("-dPDFSETTINGS=/ebook")
        .arg("-dNOPAUSE")
        .arg("-dQUIET")
        .arg("-dBATCH")
        .arg(format!("-sOutputFile={}", out_path.display()))
        .arg(input.path.display().to_string());
    invoke(
        &command,
        job.dir(),
        Some(Duration::from_secs(config.tools.timeout_secs)),
    )
    .await?;

    let out_path = expect_output_at(out_path)?;
    job.deliver(
        "compressed.zip",
        vec![Artifact::pdf(out_path, "compressed.pdf")],
    )
    .await
}
