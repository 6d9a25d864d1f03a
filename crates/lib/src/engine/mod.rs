//! Host build engine interface.
//!
//! The rules in this crate never schedule work themselves. They run inside a
//! host engine that matches targets to rules, caches outcomes and runs
//! independent targets concurrently. Everything the rules need from that host
//! is expressed by [`Engine`].
//!
//! # Submodules
//!
//! - [`rule`] - the rule contract and product patterns
//! - [`local`] - a minimal sequential host used by the CLI and tests

pub mod local;
pub mod rule;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use rule::{Applied, Insertion, Rule, RuleContext};

/// Build tags attached to a path. Tags drive compiler and analyzer flags.
pub type Tags = BTreeSet<String>;

/// Result of building one batch of targets.
pub type Outcome = Result<PathBuf, Failure>;

pub trait Engine: Send + Sync {
  /// Build each batch and return one outcome per batch, in order.
  ///
  /// A batch lists alternatives: the first one that builds is the outcome.
  /// Rule bodies may call this recursively; the call returns once every
  /// requested batch has resolved.
  fn build(&self, batches: &[Vec<PathBuf>]) -> Vec<Outcome>;

  /// Tags currently attached to `path`.
  fn tags(&self, path: &Path) -> Tags;

  /// Attach `tags` to `path`. Attaching a tag twice has no further effect.
  fn tag(&self, path: &Path, tags: &Tags);

  /// Absolute directory that targets are built into.
  fn build_dir(&self) -> &Path;
}

/// A build failure reported by the engine.
///
/// Clones share one allocation, so identity survives caching: two handles
/// refer to the same failure exactly when [`Failure::same`] says so.
#[derive(Clone)]
pub struct Failure(Arc<FailureInner>);

struct FailureInner {
  target: PathBuf,
  message: String,
}

impl Failure {
  pub fn new(target: impl Into<PathBuf>, message: impl Into<String>) -> Self {
    Self(Arc::new(FailureInner {
      target: target.into(),
      message: message.into(),
    }))
  }

  pub fn target(&self) -> &Path {
    &self.0.target
  }

  pub fn message(&self) -> &str {
    &self.0.message
  }

  /// Whether both handles refer to the same failure object.
  pub fn same(a: &Failure, b: &Failure) -> bool {
    Arc::ptr_eq(&a.0, &b.0)
  }
}

impl fmt::Debug for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Failure")
      .field("target", &self.0.target)
      .field("message", &self.0.message)
      .finish()
  }
}

impl fmt::Display for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "failed to build {}: {}", self.0.target.display(), self.0.message)
  }
}

impl std::error::Error for Failure {}
