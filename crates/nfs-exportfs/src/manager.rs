//! Export/unexport facade over the command builder and runner

use std::sync::Arc;

use tracing::info;

use crate::command::{CommandLine, ExportRequest};
use crate::config::ManagerConfig;
use crate::error::Result;
use crate::option::ExportOption;
use crate::runner::{Retrier, Spawner, SudoRetrier, SystemSpawner};

/// Exports and unexports paths by running exportfs.
///
/// Exports are not persisted to `/etc/exports`, and unexporting does not
/// remove entries from it.
pub struct NfsManager {
    program: String,
    spawner: Arc<dyn Spawner>,
    retrier: Box<dyn Retrier>,
}

impl NfsManager {
    /// Real processes, `exportfs` on `PATH`, retried under `sudo -n`.
    pub fn new() -> Self {
        Self {
            program: crate::command::EXPORTFS.to_string(),
            spawner: Arc::new(SystemSpawner),
            retrier: Box::new(SudoRetrier::default()),
        }
    }

    pub fn with_config(config: ManagerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            program: config.program,
            spawner: Arc::new(SystemSpawner),
            retrier: Box::new(SudoRetrier::new(config.escalation)),
        })
    }

    pub fn with_spawner<S: Spawner + 'static>(mut self, spawner: S) -> Self {
        self.spawner = Arc::new(spawner);
        self
    }

    pub fn with_retrier<R: Retrier + 'static>(mut self, retrier: R) -> Self {
        self.retrier = Box::new(retrier);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command line [`export_fs`](Self::export_fs) would run.
    pub fn export_command(
        &self,
        path: &str,
        host: &str,
        options: &[ExportOption],
    ) -> Result<CommandLine> {
        ExportRequest::new(path, host, options).command_line(&self.program)
    }

    /// Command line [`unexport_fs`](Self::unexport_fs) would run.
    pub fn unexport_command(&self, path: &str, host: &str) -> CommandLine {
        ExportRequest::new(path, host, &[]).unexport_command_line(&self.program)
    }

    /// Exports `path` to `host` with the given options.
    pub fn export_fs(&self, path: &str, host: &str, options: &[ExportOption]) -> Result<()> {
        let cmd = self.export_command(path, host, options)?;
        self.retrier.run(&cmd, self.spawner.as_ref())?;
        info!(path, host, "exported");
        Ok(())
    }

    /// Withdraws the export of `path` from `host`.
    pub fn unexport_fs(&self, path: &str, host: &str) -> Result<()> {
        let cmd = self.unexport_command(path, host);
        self.retrier.run(&cmd, self.spawner.as_ref())?;
        info!(path, host, "unexported");
        Ok(())
    }
}

impl Default for NfsManager {
    fn default() -> Self {
        Self::new()
    }
}
