//! Namespace rules.
//!
//! Each submodule holds one rule. [`registry`] returns all of them in the
//! order a host engine should register them.
//!
//! | rule              | products                     | insertion |
//! |-------------------|------------------------------|-----------|
//! | executable tags   | `%.byte`, `%.native`         | top       |
//! | dependency filter | `%.ml.depends`, `%.mli.depends` | top    |
//! | link              | `%.ml`, `%.mli`              | bottom    |
//! | stamp             | `%.stamp`                    | bottom    |
//! | aliases           | `%___aliases.ml`             | bottom    |
//! | namespace root    | `%.ml` (needs `%.stamp`)     | bottom    |
//! | library manifest  | `%.mllib`                    | bottom    |

pub mod aliases;
pub mod depends;
pub mod executable;
pub mod library;
pub mod link;
pub mod root;
pub mod stamp;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::analyzer::AnalyzerError;
use crate::consts::{BYTE_EXT, NATIVE_EXT};
use crate::engine::{Failure, Rule, RuleContext};
use crate::metadata::{Member, Namespace, SourceKind};
use crate::naming::namespace_dir_of;
use crate::trace::TraceError;
use crate::util::hash::HashError;

pub use aliases::AliasesRule;
pub use depends::DependsRule;
pub use executable::ExecutableTagRule;
pub use library::LibraryRule;
pub use link::LinkRule;
pub use root::RootRule;
pub use stamp::StampRule;

#[derive(Debug, Error)]
pub enum RuleError {
  #[error("{0} is not a namespace")]
  NotANamespace(PathBuf),

  #[error("{0} is not a namespaced file")]
  NotNamespacedFile(PathBuf),

  #[error("{0} is not a library namespace")]
  NotALibraryNamespace(PathBuf),

  #[error("dependency {target} failed: {failure}")]
  DependencyFailed {
    target: PathBuf,
    #[source]
    failure: Failure,
  },

  #[error(transparent)]
  Analyzer(#[from] AnalyzerError),

  #[error(transparent)]
  Trace(#[from] TraceError),

  #[error(transparent)]
  Hash(#[from] HashError),

  #[error("failed to write {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl RuleError {
  /// Reason to signal when the error only means the rule does not apply.
  pub fn inapplicable_reason(&self) -> Option<&'static str> {
    match self {
      RuleError::NotANamespace(_) => Some("not a namespace"),
      RuleError::NotNamespacedFile(_) => Some("not a namespaced file"),
      RuleError::NotALibraryNamespace(_) => Some("not a library namespace"),
      _ => None,
    }
  }

  /// Whether another rule may still build the target.
  pub fn is_recoverable(&self) -> bool {
    self.inapplicable_reason().is_some()
  }
}

/// Every namespace rule, in registration order.
pub fn registry() -> Vec<Box<dyn Rule>> {
  vec![
    Box::new(ExecutableTagRule::new(BYTE_EXT)),
    Box::new(ExecutableTagRule::new(NATIVE_EXT)),
    Box::new(DependsRule::new(SourceKind::Implementation)),
    Box::new(DependsRule::new(SourceKind::Interface)),
    Box::new(LinkRule::new(SourceKind::Implementation)),
    Box::new(LinkRule::new(SourceKind::Interface)),
    Box::new(StampRule),
    Box::new(AliasesRule),
    Box::new(RootRule),
    Box::new(LibraryRule),
  ]
}

/// The namespace whose generated artifacts are keyed by `root`.
fn namespace_at<'a>(ctx: &RuleContext<'a>, root: &Path) -> Result<&'a Namespace, RuleError> {
  namespace_dir_of(root)
    .and_then(|dir| ctx.metadata.namespace_of(&dir))
    .filter(|namespace| namespace.root_path == root)
    .ok_or_else(|| RuleError::NotANamespace(root.to_path_buf()))
}

/// Build each target on its own and require all of them to succeed.
fn require_all(ctx: &RuleContext<'_>, targets: &[PathBuf]) -> Result<(), RuleError> {
  let batches: Vec<Vec<PathBuf>> = targets.iter().map(|t| vec![t.clone()]).collect();
  for (target, outcome) in targets.iter().zip(ctx.engine.build(&batches)) {
    outcome.map_err(|failure| RuleError::DependencyFailed {
      target: target.clone(),
      failure,
    })?;
  }
  Ok(())
}

/// Write `content` to `target` in the build directory.
fn write_output(ctx: &RuleContext<'_>, target: &Path, content: &str) -> Result<PathBuf, RuleError> {
  let path = ctx.output_path(target);
  let io_error = |source| RuleError::Io {
    path: path.clone(),
    source,
  };

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(io_error)?;
  }
  std::fs::write(&path, content).map_err(io_error)?;

  info!(target = %target.display(), bytes = content.len(), "wrote");
  Ok(target.to_path_buf())
}

/// `module <Short> = <Flat>` for each member.
fn alias_lines(members: &[Member]) -> String {
  members
    .iter()
    .map(|member| format!("module {} = {}\n", member.name, member.target))
    .collect()
}
