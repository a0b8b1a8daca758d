//! External tool execution
//!
//! Runs black-box executables (LibreOffice, Ghostscript, qpdf, pdftoppm)
//! inside a request's staging area with a bounded timeout, and locates the
//! files they produce.

mod error;
mod invoke;
mod output;

pub use error::ToolError;
pub use invoke::{invoke, ToolCommand};
pub use output::{expect_output, expect_output_at, find_output_by_ext};
