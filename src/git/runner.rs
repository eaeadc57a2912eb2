use std::{future::Future, path::PathBuf, process::Stdio};

use log::{debug, trace};
use thiserror::Error;
use tokio::process::Command;

/// A single `git` invocation: arguments, working directory and extra
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInvocation {
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl GitInvocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GitInvocation {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn operation(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to run {binary} {operation}: {source}")]
    Spawn {
        binary: String,
        operation: String,
        source: std::io::Error,
    },
    #[error("git {operation} exited with {status}: {stderr}")]
    Status {
        operation: String,
        status: String,
        stderr: String,
    },
}

/// Executes git on behalf of the fetch cache.
///
/// The cache never spawns processes itself; everything goes through this
/// trait so that the clone logic can be exercised without a network.
pub trait GitRunner: Send + Sync + 'static {
    fn run(
        &self,
        invocation: GitInvocation,
    ) -> impl Future<Output = Result<(), RunnerError>> + Send;
}

/// Runs the `git` binary found on the `PATH` (or a configured one).
#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: String,
}

impl SystemGit {
    pub fn new(binary: impl Into<String>) -> Self {
        SystemGit {
            binary: binary.into(),
        }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        SystemGit::new("git")
    }
}

impl GitRunner for SystemGit {
    fn run(
        &self,
        invocation: GitInvocation,
    ) -> impl Future<Output = Result<(), RunnerError>> + Send {
        let binary = self.binary.clone();
        let mut command = Command::new(&binary);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &invocation.env {
            trace!("Setting {}={} for {}", key, value, binary);
            command.env(key, value);
        }

        async move {
            let operation = invocation.operation().to_owned();
            debug!("Executing {} {}", binary, operation);
            let output = command
                .output()
                .await
                .map_err(|source| RunnerError::Spawn {
                    binary: binary.clone(),
                    operation: operation.clone(),
                    source,
                })?;

            if output.status.success() {
                Ok(())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
                debug!("{} {} failed: {}", binary, operation, stderr);
                Err(RunnerError::Status {
                    operation,
                    status: output.status.to_string(),
                    stderr,
                })
            }
        }
    }
}
