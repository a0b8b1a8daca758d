//! Page-operation error types

use thiserror::Error;

/// Errors that can occur during in-process page operations
#[derive(Error, Debug)]
pub enum PageError {
    /// A page selector expanded to zero in-range pages
    #[error("No valid pages selected")]
    NoValidPages,

    /// The document could not be parsed, manipulated, or written
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// An uploaded image could not be read or decoded
    #[error("Image error: {0}")]
    Image(String),
}
