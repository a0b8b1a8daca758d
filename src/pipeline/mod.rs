//! Request-scoped job pipeline
//!
//! One job per request: stage the uploaded bytes into an isolated working
//! area, run the operation, package the outputs into a single deliverable,
//! and tear the whole area down once the response bytes are in hand. The
//! staging area's `Drop` impl makes cleanup unconditional — typed failure,
//! `?`-propagation, or panic all release it.

mod job;
mod package;
mod staging;

pub use job::{Job, StagedFile, StagedForm};
pub use package::{package, Artifact, Deliverable};
pub use staging::StagingArea;
