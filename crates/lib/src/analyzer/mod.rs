//! External dependency analyzer.
//!
//! Runs `<program> -modules <flags> <file>` as a blocking subprocess and
//! parses its single `target: dep dep ...` line. There is no retry: a failed
//! or malformed run is reported as is.

mod parse;

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::AnalyzerConfig;
use crate::engine::Tags;

pub use parse::{RawDependencyLine, ResolvedDependencyLine, parse_line};

#[derive(Debug, Error)]
pub enum AnalyzerError {
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{program} failed on {file} with exit code {code:?}: {stderr}")]
  InvocationFailed {
    program: String,
    file: PathBuf,
    code: Option<i32>,
    stderr: String,
  },

  #[error("malformed analyzer output: {0:?}")]
  MalformedOutput(String),
}

#[derive(Debug, Clone)]
pub struct Analyzer {
  program: String,
  flags: Vec<String>,
  tag_flags: Vec<(String, Vec<String>)>,
}

impl Analyzer {
  pub fn new(config: &AnalyzerConfig) -> Self {
    Self {
      program: config.program.clone(),
      flags: config.flags.clone(),
      tag_flags: config
        .tag_flags
        .iter()
        .map(|(tag, flags)| (tag.clone(), flags.clone()))
        .collect(),
    }
  }

  /// Arguments for analyzing `file` carrying `tags`.
  pub fn arguments(&self, file: &Path, tags: &Tags) -> Vec<String> {
    let mut args = vec!["-modules".to_string()];
    args.extend(self.flags.iter().cloned());
    for (tag, flags) in &self.tag_flags {
      if tags.contains(tag) {
        args.extend(flags.iter().cloned());
      }
    }
    args.push(file.to_string_lossy().into_owned());
    args
  }

  /// Run the analyzer on `file` from `cwd` and return its standard output.
  pub fn run(&self, cwd: &Path, file: &Path, tags: &Tags) -> Result<String, AnalyzerError> {
    let args = self.arguments(file, tags);
    info!(program = %self.program, file = %file.display(), "running dependency analyzer");
    debug!(args = ?args, cwd = %cwd.display(), "spawning analyzer");

    let output = Command::new(&self.program)
      .args(&args)
      .current_dir(cwd)
      .output()
      .map_err(|source| AnalyzerError::Spawn {
        program: self.program.clone(),
        source,
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(AnalyzerError::InvocationFailed {
        program: self.program.clone(),
        file: file.to_path_buf(),
        code: output.status.code(),
        stderr,
      });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(stdout = %stdout.trim(), "analyzer output");
    Ok(stdout)
  }

  /// Run and parse in one step.
  pub fn analyze(&self, cwd: &Path, file: &Path, tags: &Tags) -> Result<RawDependencyLine, AnalyzerError> {
    parse_line(&self.run(cwd, file, tags)?)
  }
}
