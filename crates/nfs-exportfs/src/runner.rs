//! Command execution with a single elevated retry
//!
//! The runner never talks to the OS directly. A [`Spawner`] turns a program
//! and its arguments into a [`Process`], which lets tests swap in fakes that
//! succeed, fail, or succeed only under `sudo`.

use std::process::Command;

use tracing::{debug, info, warn};

use crate::command::CommandLine;
use crate::error::{ExportfsError, Result};

/// What a finished process reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    /// stdout followed by stderr
    pub output: String,
}

/// A process ready to run.
pub trait Process {
    /// Runs to completion and captures stdout and stderr together.
    fn combined_output(self: Box<Self>) -> std::io::Result<ProcessOutput>;
}

/// Creates processes from a program name and argument list.
pub trait Spawner: Send + Sync {
    fn command(&self, program: &str, args: &[String]) -> Box<dyn Process>;
}

impl<F> Spawner for F
where
    F: Fn(&str, &[String]) -> Box<dyn Process> + Send + Sync,
{
    fn command(&self, program: &str, args: &[String]) -> Box<dyn Process> {
        self(program, args)
    }
}

/// A real child process backed by [`std::process::Command`].
#[derive(Debug)]
pub struct SystemProcess {
    command: Command,
}

impl Process for SystemProcess {
    fn combined_output(mut self: Box<Self>) -> std::io::Result<ProcessOutput> {
        let out = self.command.output()?;
        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));
        Ok(ProcessOutput {
            success: out.status.success(),
            status: out.status.code(),
            output,
        })
    }
}

/// Spawns real processes found on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn command(&self, program: &str, args: &[String]) -> Box<dyn Process> {
        let mut command = Command::new(program);
        command.args(args);
        Box::new(SystemProcess { command })
    }
}

/// Policy deciding how a command line is run through a spawner.
pub trait Retrier: Send + Sync {
    fn run(&self, cmd: &CommandLine, spawner: &dyn Spawner) -> Result<()>;
}

impl<F> Retrier for F
where
    F: Fn(&CommandLine, &dyn Spawner) -> Result<()> + Send + Sync,
{
    fn run(&self, cmd: &CommandLine, spawner: &dyn Spawner) -> Result<()> {
        self(cmd, spawner)
    }
}

/// Default elevation prefix.
pub fn default_escalation() -> Vec<String> {
    vec!["sudo".to_string(), "-n".to_string()]
}

/// Runs a command once and, if that fails for any reason, once more with
/// an elevation prefix such as `sudo -n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudoRetrier {
    escalation: Vec<String>,
}

impl SudoRetrier {
    pub fn new(escalation: Vec<String>) -> Self {
        Self { escalation }
    }

    pub fn escalation(&self) -> &[String] {
        &self.escalation
    }
}

impl Default for SudoRetrier {
    fn default() -> Self {
        Self::new(default_escalation())
    }
}

impl Retrier for SudoRetrier {
    fn run(&self, cmd: &CommandLine, spawner: &dyn Spawner) -> Result<()> {
        let first = match attempt(cmd, spawner) {
            Ok(()) => return Ok(()),
            Err(ExportfsError::EmptyCommandLine) => return Err(ExportfsError::EmptyCommandLine),
            Err(e) => e,
        };

        warn!(
            command = %cmd,
            error = %first,
            output = first.output().unwrap_or_default(),
            "command failed"
        );
        warn!("retrying with {}", self.escalation.join(" "));

        let escalated = cmd.escalated(&self.escalation);
        attempt(&escalated, spawner).map_err(|e| {
            let output = match e {
                ExportfsError::CommandFailed { output, .. } => output,
                other => other.to_string(),
            };
            ExportfsError::EscalatedFailure {
                command: escalated.to_string(),
                output,
            }
        })
    }
}

/// Runs `cmd`, retrying once under `sudo -n` when the first attempt fails.
pub fn run_and_retry_with_sudo(cmd: &CommandLine, spawner: &dyn Spawner) -> Result<()> {
    SudoRetrier::default().run(cmd, spawner)
}

fn attempt(cmd: &CommandLine, spawner: &dyn Spawner) -> Result<()> {
    let program = cmd.program().ok_or(ExportfsError::EmptyCommandLine)?;
    debug!(command = %cmd, "running");

    let out = spawner
        .command(program, cmd.args())
        .combined_output()
        .map_err(|source| ExportfsError::Spawn {
            command: cmd.to_string(),
            source,
        })?;

    if out.success {
        info!(command = %cmd, "command succeeded");
        return Ok(());
    }
    Err(ExportfsError::CommandFailed {
        command: cmd.to_string(),
        status: out.status,
        output: out.output,
    })
}
