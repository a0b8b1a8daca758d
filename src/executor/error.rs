//! Execution-specific error types
//!
//! Errors that can occur while running external tools (process spawning,
//! timeouts, missing outputs).

use thiserror::Error;

/// Errors that can occur during external tool invocation
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable could not be located or launched
    #[error("External tool not found: {0}")]
    NotFound(String),

    /// The process exited with a non-zero status
    #[error("External tool failed: {0}")]
    Failed(String),

    /// The process exceeded its timeout and was killed
    #[error("External tool timed out after {0} seconds")]
    TimedOut(u64),

    /// The process exited successfully but the expected output file is absent
    #[error("External tool produced no output: {0}")]
    OutputMissing(String),
}
