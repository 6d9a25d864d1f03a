//! Order command implementation.

use std::path::Path;

use anyhow::{Context, Result};

use nsbuild_lib::config::Config;
use nsbuild_lib::trace::{BuildLog, CompileTrace, order_members};

pub fn cmd_order(project: &Path, log: &Path, members: &[String]) -> Result<()> {
  let config = Config::load(project).context("Failed to load configuration")?;
  let log = BuildLog::new(project.join(log), &config.trace.compilers)?;
  let order = log.compile_order()?;

  for member in order_members(members, &order) {
    println!("{}", member);
  }
  Ok(())
}
