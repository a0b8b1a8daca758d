//! In-process PDF page operations
//!
//! Everything here works on a whole `lopdf::Document` held in memory:
//! concatenating documents, splitting a document into single pages,
//! extracting a selector-described page set, and building a PDF out of
//! JPEG images.

mod error;
mod images;
mod ops;
mod selector;

pub use error::PageError;
pub use images::images_to_pdf;
pub use ops::{extract_pages, load_document, merge_documents, save_document, split_document};
pub use selector::parse_page_selector;
