//! Test command execution
//!
//! The command's stdout and stderr are inherited so its output streams live,
//! interleaved with autotest's own log lines.

use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Failure of a single test run
#[derive(Error, Debug)]
pub enum RunError {
    /// The process could not be started
    #[error("error starting {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited unsuccessfully
    #[error("error running {command}: {status}")]
    Exit { command: String, status: ExitStatus },
}

/// Something that can run the test suite once
#[async_trait]
pub trait TestRunner: Send {
    /// Run the tests with `args` forwarded verbatim, waiting for completion
    async fn run(&mut self, args: &[OsString]) -> Result<(), RunError>;
}

/// Runs an external test command (`go test` by default)
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    base_args: Vec<String>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    /// Command name used in error messages, e.g. `go test`
    pub fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.base_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl TestRunner for CommandRunner {
    async fn run(&mut self, args: &[OsString]) -> Result<(), RunError> {
        debug!("running {} with {} forwarded args", self.describe(), args.len());

        let status = Command::new(&self.program)
            .args(&self.base_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| RunError::Launch {
                command: self.describe(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::Exit {
                command: self.describe(),
                status,
            })
        }
    }
}
