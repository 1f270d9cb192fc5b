//! External tool execution.
//!
//! Probing and remuxing both go through [`ProcessRunner`] so tests can swap
//! in canned `(stdout, stderr, exit code)` triples without spawning anything.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Output captured from a finished tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Failures that prevent a tool from producing an exit status.
///
/// A non-zero exit is not one of them; callers read it from [`ProcessOutput`].
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed while waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`, capture both output streams fully and wait
    /// for it to exit.
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError>;
}

/// Runs tools as tokio child processes.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    timeout: Option<Duration>,
}

impl TokioProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    #[tracing::instrument(skip(self, args), fields(process.executable.name = %program))]
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError> {
        let start = Instant::now();

        // kill_on_drop covers a cancelled caller; the timeout path kills and reaps below.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Launch {
                program: program.to_string(),
                source,
            })?;

        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        let waited = match self.timeout {
            Some(limit) => {
                let finished = tokio::select! {
                    status = child.wait() => Some(status),
                    _ = tokio::time::sleep(limit) => None,
                };
                match finished {
                    Some(status) => status,
                    None => {
                        tracing::warn!(
                            timeout_secs = limit.as_secs(),
                            "Process exceeded timeout, killing"
                        );
                        // kill() also waits, so no zombie outlives this call.
                        if let Err(e) = child.kill().await {
                            tracing::warn!(error = %e, "Failed to kill timed out process");
                        }
                        stdout_task.abort();
                        stderr_task.abort();
                        return Err(ProcessError::TimedOut {
                            program: program.to_string(),
                            timeout: limit,
                        });
                    }
                }
            }
            None => child.wait().await,
        };

        let status = waited.map_err(|source| ProcessError::Wait {
            program: program.to_string(),
            source,
        })?;
        let stdout = collect(stdout_task, program).await?;
        let stderr = collect(stderr_task, program).await?;

        let result = ProcessOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code: status.code(),
        };

        tracing::debug!(
            exit_code = ?result.exit_code,
            duration_ms = start.elapsed().as_millis(),
            "Process finished"
        );

        Ok(result)
    }
}

/// Read a child pipe to the end.
async fn drain<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn collect(
    task: JoinHandle<std::io::Result<Vec<u8>>>,
    program: &str,
) -> Result<Vec<u8>, ProcessError> {
    task.await
        .map_err(std::io::Error::other)
        .and_then(|read| read)
        .map_err(|source| ProcessError::Wait {
            program: program.to_string(),
            source,
        })
}
