//! nfs-exportfs: export or unexport a path via exportfs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nfs_exportfs::{parse_options, ExportOption, ManagerConfig, NfsManager};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "nfs-exportfs")]
#[command(about = "Export or unexport NFS paths, retrying with sudo on failure", long_about = None)]
struct Cli {
    /// TOML file overriding the exportfs program and elevation prefix
    #[arg(short, long, env = "NFS_EXPORTFS_CONFIG")]
    config: Option<PathBuf>,

    /// Print the command line instead of running it
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export PATH to HOST
    Export {
        path: String,
        host: String,
        /// Export options, e.g. `-o rw,no_root_squash -o fsid=1`
        #[arg(short = 'o', long = "options")]
        options: Vec<String>,
    },
    /// Withdraw the export of PATH from HOST
    Unexport { path: String, host: String },
}

/// Used when `RUST_LOG` is unset, so the failed first attempt still shows.
const DEFAULT_LOG_FILTER: &str = "warn";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ManagerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ManagerConfig::default(),
    };
    let manager = NfsManager::with_config(config)?;

    match cli.command {
        Command::Export {
            path,
            host,
            options,
        } => {
            let mut parsed: Vec<ExportOption> = Vec::new();
            for list in &options {
                parsed.extend(parse_options(list)?);
            }
            if cli.dry_run {
                println!("{}", manager.export_command(&path, &host, &parsed)?);
                return Ok(());
            }
            manager
                .export_fs(&path, &host, &parsed)
                .with_context(|| format!("exporting {} to {}", path, host))?;
        }
        Command::Unexport { path, host } => {
            if cli.dry_run {
                println!("{}", manager.unexport_command(&path, &host));
                return Ok(());
            }
            manager
                .unexport_fs(&path, &host)
                .with_context(|| format!("unexporting {} from {}", path, host))?;
        }
    }

    Ok(())
}
