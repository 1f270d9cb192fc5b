//! Scripted stand-in for ffprobe and ffmpeg.

use async_trait::async_trait;
use std::sync::Mutex;
use tubely_processing::{ProcessError, ProcessOutput, ProcessRunner};

use super::{FFMPEG, FFPROBE};

pub const REMUXED_BYTES: &[u8] = b"moov-then-mdat";

/// Canned `(stdout, stderr, exit code)` triple.
#[derive(Debug, Clone)]
pub struct Canned {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl Canned {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn fail(stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    fn output(&self) -> ProcessOutput {
        ProcessOutput {
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            exit_code: Some(self.exit_code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemuxBehavior {
    /// Write the output file, then report the canned result.
    WriteOutput,
    /// Report the canned result without touching the filesystem.
    NoOutput,
    /// Write a partial output file and never finish.
    Hang,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
}

pub struct FakeRunner {
    probe: Canned,
    remux: Canned,
    remux_behavior: RemuxBehavior,
    calls: Mutex<Vec<Call>>,
}

impl FakeRunner {
    pub fn new(probe: Canned, remux: Canned, remux_behavior: RemuxBehavior) -> Self {
        Self {
            probe,
            remux,
            remux_behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// ffprobe reports `width`x`height`, ffmpeg succeeds.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self::new(
            Canned::ok(super::fixtures::probe_json(width, height)),
            Canned::ok(""),
            RemuxBehavior::WriteOutput,
        )
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.program == program)
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(Call {
            program: program.to_string(),
            args: args.to_vec(),
        });

        match program {
            FFPROBE => Ok(self.probe.output()),
            FFMPEG => {
                let output_path = args.last().expect("ffmpeg output path");
                match self.remux_behavior {
                    RemuxBehavior::WriteOutput => {
                        tokio::fs::write(output_path, REMUXED_BYTES).await.unwrap();
                    }
                    RemuxBehavior::NoOutput => {}
                    RemuxBehavior::Hang => {
                        tokio::fs::write(output_path, b"partial").await.unwrap();
                        std::future::pending::<()>().await;
                    }
                }
                Ok(self.remux.output())
            }
            other => panic!("unexpected program {other}"),
        }
    }
}
