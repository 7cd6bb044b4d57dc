//! exportfs command builder and runner
//!
//! Builds `exportfs` argument lists from a path, a host and a set of export
//! options, then runs them, retrying once under `sudo -n` when the plain
//! attempt fails.

pub mod command;
pub mod config;
pub mod error;
pub mod manager;
pub mod option;
pub mod runner;

pub use command::{export_command_line, unexport_command_line, CommandLine, ExportRequest};
pub use config::ManagerConfig;
pub use error::{ExportfsError, Result};
pub use manager::NfsManager;
pub use option::{join_options, parse_options, ExportOption};
pub use runner::{
    run_and_retry_with_sudo, Process, ProcessOutput, Retrier, Spawner, SudoRetrier, SystemSpawner,
};
