//! Compile order observed in the build log.
//!
//! Library members are ordered by when the compiler actually saw them rather
//! than by a graph computed here. The log has one line per command the host
//! ran; a line counts as a compilation when it matches
//!
//! ```text
//! line := ... compiler ... '-c' ... path '.ml' ...
//! ```
//!
//! where `compiler` is one of the configured program names. The module name
//! is taken from the path.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::consts::IMPL_EXT;
use crate::naming::module_name_of_path;

#[derive(Debug, Error)]
pub enum TraceError {
  #[error("build log {path} does not exist; run the host engine with logging enabled")]
  MissingBuildLog { path: PathBuf },

  #[error("failed to read build log {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid compiler pattern: {0}")]
  Pattern(#[from] regex::Error),
}

/// Source of the chronological compile order, first occurrence only.
pub trait CompileTrace {
  fn compile_order(&self) -> Result<Vec<String>, TraceError>;
}

/// One recognized compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub compiler: String,
  pub source: PathBuf,
}

impl Invocation {
  pub fn module_name(&self) -> String {
    module_name_of_path(&self.source)
  }
}

/// Recognizes compiler invocation lines.
#[derive(Debug, Clone)]
pub struct InvocationMatcher {
  regex: Regex,
}

impl InvocationMatcher {
  pub fn new<S: AsRef<str>>(compilers: &[S]) -> Result<Self, TraceError> {
    let alternatives = compilers
      .iter()
      .map(|c| regex::escape(c.as_ref()))
      .collect::<Vec<_>>()
      .join("|");
    let pattern = format!(
      r"(?:^|[\s/])(?P<compiler>{alternatives})\s(?:.*\s)?-c\s(?:.*\s)?(?P<source>[^\s'\x22]+\.{ext})(?:[\s'\x22]|$)",
      ext = regex::escape(IMPL_EXT),
    );
    Ok(Self {
      regex: Regex::new(&pattern)?,
    })
  }

  pub fn parse(&self, line: &str) -> Option<Invocation> {
    let captures = self.regex.captures(line)?;
    Some(Invocation {
      compiler: captures.name("compiler")?.as_str().to_string(),
      source: PathBuf::from(captures.name("source")?.as_str()),
    })
  }

  /// Module names in first-seen order.
  pub fn scan(&self, log: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for invocation in log.lines().filter_map(|line| self.parse(line)) {
      let name = invocation.module_name();
      if seen.insert(name.clone()) {
        order.push(name);
      }
    }
    order
  }
}

/// The host engine's build log on disk.
#[derive(Debug, Clone)]
pub struct BuildLog {
  path: PathBuf,
  matcher: InvocationMatcher,
}

impl BuildLog {
  pub fn new<S: AsRef<str>>(path: impl Into<PathBuf>, compilers: &[S]) -> Result<Self, TraceError> {
    Ok(Self {
      path: path.into(),
      matcher: InvocationMatcher::new(compilers)?,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl CompileTrace for BuildLog {
  fn compile_order(&self) -> Result<Vec<String>, TraceError> {
    let content = match std::fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(TraceError::MissingBuildLog {
          path: self.path.clone(),
        });
      }
      Err(source) => {
        return Err(TraceError::Io {
          path: self.path.clone(),
          source,
        });
      }
    };

    let order = self.matcher.scan(&content);
    debug!(log = %self.path.display(), modules = order.len(), "read compile order");
    Ok(order)
  }
}

/// Sort library members by compile order.
///
/// Members are module paths with or without extension. The sort is stable;
/// members that never appear in `order` keep their relative order and go
/// after every compiled member.
pub fn order_members(members: &[String], order: &[String]) -> Vec<String> {
  let index: HashMap<&str, usize> = order.iter().enumerate().map(|(i, name)| (name.as_str(), i)).collect();

  let mut sorted = members.to_vec();
  sorted.sort_by_key(|member| {
    index
      .get(module_name_of_path(Path::new(member)).as_str())
      .copied()
      .unwrap_or(usize::MAX)
  });
  sorted
}
