//! The rule contract.
//!
//! A rule declares `(name, products, dependencies, insertion)` and is applied
//! to one target at a time. Products and dependencies are patterns with a
//! single `%` wildcard, e.g. `%.ml.depends` with dependency `%.ml`.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::engine::Engine;
use crate::metadata::NamespaceMetadata;
use crate::rules::RuleError;

/// Where a rule is registered relative to the host's own rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
  /// Considered before every generic rule of the host.
  Top,
  /// Considered after the rules already registered.
  Bottom,
}

/// What applying a rule produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
  /// The target was written.
  Built(PathBuf),
  /// The rule does not apply to the target. Side effects already performed
  /// (such as attached tags) stay in place.
  Inapplicable(String),
}

/// Everything a rule body can reach.
pub struct RuleContext<'a> {
  pub engine: &'a dyn Engine,
  pub metadata: &'a dyn NamespaceMetadata,
  pub config: &'a Config,
}

impl RuleContext<'_> {
  /// Absolute location of a build-directory relative path.
  pub fn output_path(&self, target: &Path) -> PathBuf {
    self.engine.build_dir().join(target)
  }
}

pub trait Rule: Send + Sync {
  fn name(&self) -> &str;

  fn products(&self) -> Vec<String>;

  fn dependencies(&self) -> Vec<String> {
    Vec::new()
  }

  fn insertion(&self) -> Insertion {
    Insertion::Bottom
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError>;
}

/// Match `target` against a `%` pattern, returning what `%` stood for.
pub fn match_pattern(pattern: &str, target: &Path) -> Option<String> {
  let target = target.to_str()?;
  let (prefix, suffix) = pattern.split_once('%')?;
  let stem = target.strip_prefix(prefix)?.strip_suffix(suffix)?;
  (!stem.is_empty()).then(|| stem.to_string())
}

/// Replace the `%` of `pattern` with `stem`.
pub fn substitute(pattern: &str, stem: &str) -> PathBuf {
  PathBuf::from(pattern.replacen('%', stem, 1))
}
