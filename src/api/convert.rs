//! Format conversion endpoints
//!
//! Office documents go through LibreOffice in headless mode; PDF pages are
//! rasterized to JPEG with pdftoppm; JPEGs are assembled into a PDF
//! in-process.

use crate::config::Config;
use crate::error::AppError;
use crate::executor::{expect_output, find_output_by_ext, invoke, ToolCommand};
use crate::pages::{images_to_pdf, save_document};
use crate::pipeline::{Artifact, Job};
use axum::extract::{Multipart, State};
use axum::response::Response;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// LibreOffice conversion targets
#[derive(Debug, Clone, Copy)]
enum OfficeTarget {
    Pdf,
    Docx,
    Xlsx,
    Pptx,
}

impl OfficeTarget {
    fn ext(self) -> &'static str {
        match self {
            OfficeTarget::Pdf => "pdf",
            OfficeTarget::Docx => "docx",
            OfficeTarget::Xlsx => "xlsx",
            OfficeTarget::Pptx => "pptx",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            OfficeTarget::Pdf => "application/pdf",
            OfficeTarget::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OfficeTarget::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            OfficeTarget::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

/// Run soffice against the single uploaded file and deliver its output.
///
/// For PDF targets the output name is deterministic (input stem plus
/// `.pdf`), so it is verified by name; other targets are located by
/// extension scan.
async fn office_convert(
    config: Arc<Config>,
    multipart: Multipart,
    operation: &'static str,
    target: OfficeTarget,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, operation).await?;
    let form = job.stage(multipart).await?;
    let input = form.single_file()?;

    let command = ToolCommand::new(&config.tools.soffice_bin)
        .arg("--headless")
        .arg("--convert-to")
        .arg(target.ext())
        .arg("--outdir")
        .arg(job.dir().display().to_string())
        .arg(input.path.display().to_string());
    invoke(
        &command,
        job.dir(),
        Some(Duration::from_secs(config.tools.timeout_secs)),
    )
    .await?;

    let out_path = match target {
        OfficeTarget::Pdf => {
            let stem = input
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "converted".to_string());
            expect_output(job.dir(), &format!("{}.pdf", stem))?
        }
        _ => find_output_by_ext(job.dir(), target.ext())?,
    };
    let name = out_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("converted.{}", target.ext()));

    job.deliver(
        "converted.zip",
        vec![Artifact {
            path: out_path,
            name,
            content_type: target.content_type(),
        }],
    )
    .await
}

/// `POST /convert/word-to-pdf`
pub async fn word_to_pdf(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    office_convert(config, multipart, "word2pdf", OfficeTarget::Pdf).await
}

/// `POST /convert/excel-to-pdf`
pub async fn excel_to_pdf(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    office_convert(config, multipart, "excel2pdf", OfficeTarget::Pdf).await
}

/// `POST /convert/ppt-to-pdf`
pub async fn ppt_to_pdf(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    office_convert(config, multipart, "ppt2pdf", OfficeTarget::Pdf).await
}

/// `POST /convert/pdf-to-word`
pub async fn pdf_to_word(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    office_convert(config, multipart, "pdf2word", OfficeTarget::Docx).await
}

/// `POST /convert/pdf-to-excel`
pub async fn pdf_to_excel(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    office_convert(config, multipart, "pdf2excel", OfficeTarget::Xlsx).await
}

/// `POST /convert/pdf-to-ppt`
pub async fn pdf_to_ppt(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    office_convert(config, multipart, "pdf2ppt", OfficeTarget::Pptx).await
}

/// `POST /convert/pdf-to-jpg` — rasterize every page to JPEG via pdftoppm
pub async fn pdf_to_jpg(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "pdf2jpg").await?;
    let form = job.stage(multipart).await?;
    let input = form.single_file()?;

    let command = ToolCommand::new(&config.tools.pdftoppm_bin)
        .arg("-jpeg")
        .arg("-r")
        .arg("150")
        .arg(input.path.display().to_string())
        .arg(job.dir().join("page").display().to_string());
    invoke(
        &command,
        job.dir(),
        Some(Duration::from_secs(config.tools.timeout_secs)),
    )
    .await?;

    // pdftoppm emits page-1.jpg, page-2.jpg, … zero-padded to a fixed
    // width, so a lexicographic sort is page order
    let mut produced: Vec<PathBuf> = std::fs::read_dir(job.dir())
        .map_err(|e| AppError::Resource(format!("cannot scan staging area: {}", e)))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|e| e.eq_ignore_ascii_case("jpg"))
                .unwrap_or(false)
        })
        .collect();
    produced.sort();
    if produced.is_empty() {
        return Err(crate::executor::ToolError::OutputMissing(
            "no .jpg file in working area".to_string(),
        )
        .into());
    }

    let artifacts = produced
        .into_iter()
        .enumerate()
        .map(|(index, path)| Artifact {
            path,
            name: format!("page_{}.jpg", index + 1),
            content_type: "image/jpeg",
        })
        .collect();

    job.deliver("pages_images.zip", artifacts).await
}

/// `POST /convert/jpg-to-pdf` — assemble the uploaded JPEGs into one PDF,
/// one page per image, in upload order
pub async fn jpg_to_pdf(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let job = Job::begin(&config, "jpg2pdf").await?;
    let form = job.stage(multipart).await?;
    if form.files.is_empty() {
        return Err(AppError::BadRequest("no images uploaded".to_string()));
    }

    let paths: Vec<PathBuf> = form.files.iter().map(|f| f.path.clone()).collect();
    let mut document = images_to_pdf(&paths)?;

    let out_path = job.dir().join("output.pdf");
    save_document(&mut document, &out_path)?;

    job.deliver("output.zip", vec![Artifact::pdf(out_path, "output.pdf")])
        .await
}
