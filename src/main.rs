use std::path::PathBuf;

use clap::{Parser, Subcommand};

use probe_fs::ops::{Context, GlobLimits, GlobRequest, ReadRequest};
use probe_fs::{ProbeConfig, Result};

#[derive(Debug, Parser)]
#[command(name = "probe-fs")]
#[command(
    about = "Privilege-aware, resource-bounded file reads and glob resolution for host instrumentation."
)]
struct Cli {
    /// Optional config file (.toml or .json); defaults apply otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Whole-buffer bounded read.
    Read {
        path: PathBuf,
        /// Authoritative size for special files (devices, pipes).
        #[arg(long)]
        size_hint: Option<u64>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value_t = false)]
        preserve_time: bool,
        #[arg(long, default_value_t = false)]
        blocking: bool,
    },
    /// Read with atime/mtime restored afterward.
    ForensicRead {
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        blocking: bool,
    },
    /// Validate a read without touching file content; prints the canonical path.
    Probe { path: PathBuf },
    /// Expand a wildcard pattern (supports `*`, `**`, and SQL-style `%`).
    Resolve {
        pattern: String,
        #[arg(long, default_value_t = false)]
        files_only: bool,
        #[arg(long, default_value_t = false)]
        folders_only: bool,
        #[arg(long, default_value_t = false)]
        no_canonicalize: bool,
    },
    /// List files in (or recursively under) a directory.
    ListFiles {
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        recursive: bool,
    },
    /// List directories in (or recursively under) a directory.
    ListDirs {
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        recursive: bool,
    },
    /// Check whether a path is safe to treat as loadable content.
    CheckPerms {
        dir: PathBuf,
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        executable: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = match &cli.config {
        Some(path) => Context::from_config_path(path)?,
        None => Context::new(ProbeConfig::default())?,
    };

    let value = match cli.command {
        Command::Read {
            path,
            size_hint,
            dry_run,
            preserve_time,
            blocking,
        } => {
            let mut request = ReadRequest::new(path);
            request.size_hint = size_hint;
            request.dry_run = dry_run;
            request.preserve_time = preserve_time;
            request.blocking = blocking;
            serde_json::to_value(ctx.read_file(request)?)?
        }
        Command::ForensicRead { path, blocking } => {
            serde_json::to_value(ctx.forensic_read_file(path, blocking)?)?
        }
        Command::Probe { path } => serde_json::to_value(ctx.probe_read_file(path, false)?)?,
        Command::Resolve {
            pattern,
            files_only,
            folders_only,
            no_canonicalize,
        } => {
            let mut limits = match (files_only, folders_only) {
                (true, false) => GlobLimits::FILES,
                (false, true) => GlobLimits::FOLDERS,
                _ => GlobLimits::ALL,
            };
            if no_canonicalize {
                limits |= GlobLimits::NO_CANONICALIZE;
            }
            serde_json::to_value(ctx.resolve_file_pattern(GlobRequest { pattern, limits })?)?
        }
        Command::ListFiles { path, recursive } => {
            serde_json::to_value(ctx.list_files_in_directory(&path, recursive)?)?
        }
        Command::ListDirs { path, recursive } => {
            serde_json::to_value(ctx.list_directories_in_directory(&path, recursive)?)?
        }
        Command::CheckPerms {
            dir,
            path,
            executable,
        } => serde_json::to_value(ctx.safe_permissions(&dir, &path, executable))?,
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
