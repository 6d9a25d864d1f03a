//! Analyzer output grammar.
//!
//! ```text
//! line   := target ':' deps
//! deps   := (whitespace+ name)* whitespace*
//! ```
//!
//! Only the first non-blank line is meaningful. The target is split off at the
//! first colon and kept for diagnostics only.

use std::fmt;
use std::path::PathBuf;

use super::AnalyzerError;
use crate::metadata::{NamespaceMetadata, NamespacedFile};

/// Dependencies of one file as the analyzer reported them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDependencyLine {
  pub target: String,
  pub dependencies: Vec<String>,
}

/// Dependencies of one file with every name mapped into the flat module space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependencyLine {
  pub target: PathBuf,
  pub dependencies: Vec<String>,
}

impl fmt::Display for ResolvedDependencyLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.target.display(), self.dependencies.join(" "))
  }
}

pub fn parse_line(output: &str) -> Result<RawDependencyLine, AnalyzerError> {
  let line = output.lines().find(|line| !line.trim().is_empty()).unwrap_or_default();

  let (target, rest) = line
    .split_once(':')
    .ok_or_else(|| AnalyzerError::MalformedOutput(output.to_string()))?;

  Ok(RawDependencyLine {
    target: target.trim().to_string(),
    dependencies: rest.split_whitespace().map(str::to_string).collect(),
  })
}

impl RawDependencyLine {
  /// Map every dependency through the namespace tables of `file`.
  ///
  /// Names that do not resolve are kept verbatim: they refer to modules outside
  /// the namespace system. Order and count are preserved. The target is taken
  /// from `file`, not from the analyzer output.
  pub fn resolve(&self, metadata: &dyn NamespaceMetadata, file: &NamespacedFile) -> ResolvedDependencyLine {
    ResolvedDependencyLine {
      target: file.virtual_path.clone(),
      dependencies: self
        .dependencies
        .iter()
        .map(|raw| metadata.resolve(file, raw).unwrap_or_else(|| raw.clone()))
        .collect(),
    }
  }
}
