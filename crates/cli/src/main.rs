mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_build, cmd_depends, cmd_namespaces, cmd_order};

/// nsb - namespace rules for flat-module builds
#[derive(Parser)]
#[command(name = "nsb")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Project root (default: current directory)
  #[arg(short, long, global = true)]
  project: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List namespaces and their members
  Namespaces {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Build targets with the local engine
  Build {
    /// Targets, relative to the project root
    #[arg(required = true)]
    targets: Vec<PathBuf>,
  },

  /// Print the resolved dependency line of a source file
  Depends {
    /// Virtual or original path of a namespaced source file
    file: PathBuf,
  },

  /// Order library members by a build log
  Order {
    /// Build log to read the compile order from
    #[arg(long)]
    log: PathBuf,

    /// Member module paths, in declaration order
    #[arg(required = true)]
    members: Vec<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let project = match cli.project {
    Some(dir) => dir,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };
  let project = dunce::canonicalize(&project).with_context(|| format!("Project not found: {}", project.display()))?;

  match cli.command {
    Commands::Namespaces { json } => cmd_namespaces(&project, json, cli.verbose),
    Commands::Build { targets } => cmd_build(&project, &targets),
    Commands::Depends { file } => cmd_depends(&project, &file),
    Commands::Order { log, members } => cmd_order(&project, &log, &members),
  }
}
