//! Library manifest: `R.mllib`.
//!
//! Members are listed in the order the compiler actually compiled them. The
//! rule first builds the dependency artifact of every member, which makes the
//! host compile the members in dependency order, and then reads that order
//! back from the build log.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{RuleError, namespace_at, require_all, write_output};
use crate::consts::{DEPENDS_SUFFIX, IMPL_EXT, MANIFEST_EXT};
use crate::engine::rule::match_pattern;
use crate::engine::{Applied, Rule, RuleContext};
use crate::naming::with_suffix;
use crate::trace::{BuildLog, CompileTrace, order_members};

#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryRule;

impl LibraryRule {
  fn product() -> String {
    format!("%.{}", MANIFEST_EXT)
  }
}

/// Dependency artifact of a library member, e.g. `lib/foo/foo__a.ml.depends`.
pub fn member_depends(member: &str) -> PathBuf {
  let suffix = format!(".{}", IMPL_EXT);
  let source = if member.ends_with(&suffix) {
    PathBuf::from(member)
  } else {
    PathBuf::from(format!("{}{}", member, suffix))
  };
  with_suffix(&source, DEPENDS_SUFFIX)
}

/// Manifest text for `members` given the observed compile order.
pub fn manifest(members: &[String], trace: &dyn CompileTrace) -> Result<String, RuleError> {
  let order = trace.compile_order()?;
  Ok(order_members(members, &order).join("\n"))
}

impl Rule for LibraryRule {
  fn name(&self) -> &str {
    "library manifest"
  }

  fn products(&self) -> Vec<String> {
    vec![Self::product()]
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    let root = match_pattern(&Self::product(), target)
      .ok_or_else(|| RuleError::NotALibraryNamespace(target.to_path_buf()))?;
    let namespace = namespace_at(ctx, Path::new(&root))
      .map_err(|_| RuleError::NotALibraryNamespace(target.to_path_buf()))?;
    let members = ctx
      .metadata
      .library_members(namespace)
      .ok_or_else(|| RuleError::NotALibraryNamespace(target.to_path_buf()))?;

    let depends: Vec<PathBuf> = members.iter().map(|member| member_depends(member)).collect();
    debug!(library = %namespace.library_name(), members = members.len(), "building library members");
    require_all(ctx, &depends)?;

    let log = BuildLog::new(ctx.output_path(&ctx.config.build_log), &ctx.config.trace.compilers)?;
    let content = manifest(&members, &log)?;
    Ok(Applied::Built(write_output(ctx, target, &content)?))
  }
}
