//! Build command implementation.
//!
//! Drives the namespace rules through the local engine and reports one line
//! per requested target.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::debug;

use nsbuild_lib::config::Config;
use nsbuild_lib::engine::local::LocalEngine;

use crate::output::{format_duration, print_error, print_info, print_success};

pub fn cmd_build(project: &Path, targets: &[PathBuf]) -> Result<()> {
  let config = Config::load(project).context("Failed to load configuration")?;
  let engine = LocalEngine::open(project, config).context("Failed to scan source directories")?;
  let start = Instant::now();

  let mut failed = 0;
  for target in targets {
    match engine.build_target(target) {
      Ok(path) => print_success(&format!("Built {}", path.display())),
      Err(failure) => {
        failed += 1;
        print_error(&failure.to_string());
      }
    }
  }
  debug!(signals = engine.failures().len(), "memoized inapplicable signals");

  print_info(&format!(
    "{} of {} target(s) built in {}",
    targets.len() - failed,
    targets.len(),
    format_duration(start.elapsed())
  ));

  if failed > 0 {
    bail!("{} target(s) failed", failed);
  }
  Ok(())
}
