//! External process invocation
//!
//! Spawns a single external command inside a working directory and waits for
//! it to finish, with an optional timeout after which the process is killed.

use crate::executor::error::ToolError;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// Specification of one external command: the program and its arguments.
///
/// Paths in the argument vector are expected to point inside the staging
/// area the command runs in.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a command spec for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Run an external command to completion inside `working_dir`.
///
/// With `run_timeout = Some(d)`, the process is killed if it runs longer than
/// `d` and the call fails with [`ToolError::TimedOut`]. With `None` the call
/// waits indefinitely (used for qpdf encryption runs).
///
/// stdout/stderr are not interpreted; stderr is only echoed into the error
/// message on a non-zero exit.
pub async fn invoke(
    spec: &ToolCommand,
    working_dir: &Path,
    run_timeout: Option<Duration>,
) -> Result<(), ToolError> {
    debug!(
        program = %spec.program,
        args = ?spec.args,
        working_dir = %working_dir.display(),
        "Spawning external tool"
    );

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(working_dir)
        // If the timeout fires we drop the output future; make sure the
        // child dies with it instead of being orphaned.
        .kill_on_drop(true);

    let output = match run_timeout {
        Some(limit) => match timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    program = %spec.program,
                    timeout_secs = limit.as_secs(),
                    "External tool timed out"
                );
                return Err(ToolError::TimedOut(limit.as_secs()));
            }
        },
        None => cmd.output().await,
    };

    let output = output.map_err(|e| {
        error!(program = %spec.program, error = %e, "Failed to launch external tool");
        if e.kind() == ErrorKind::NotFound {
            ToolError::NotFound(spec.program.clone())
        } else {
            ToolError::NotFound(format!("{}: {}", spec.program, e))
        }
    })?;

    if output.status.success() {
        info!(program = %spec.program, "External tool finished");
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let exit_code = output.status.code().unwrap_or(-1);
        error!(
            program = %spec.program,
            exit_code = exit_code,
            stderr = %stderr,
            "External tool exited with failure"
        );
        Err(ToolError::Failed(format!(
            "{} exited with code {}: {}",
            spec.program,
            exit_code,
            stderr.trim()
        )))
    }
}
