//! Namespace digest stamp.
//!
//! Building `R.stamp` brings every file of the namespace's dependency closure
//! up to date and records a digest over them. The stamp's content is the
//! digest, which the root generator embeds.

use std::path::Path;

use tracing::debug;

use super::{RuleError, namespace_at, require_all, write_output};
use crate::consts::STAMP_EXT;
use crate::engine::rule::match_pattern;
use crate::engine::{Applied, Rule, RuleContext};
use crate::util::hash::digest_files;

#[derive(Debug, Clone, Copy, Default)]
pub struct StampRule;

impl StampRule {
  fn product() -> String {
    format!("%.{}", STAMP_EXT)
  }
}

impl Rule for StampRule {
  fn name(&self) -> &str {
    "namespace stamp"
  }

  fn products(&self) -> Vec<String> {
    vec![Self::product()]
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    let root = match_pattern(&Self::product(), target).ok_or_else(|| RuleError::NotANamespace(target.to_path_buf()))?;
    let namespace = namespace_at(ctx, Path::new(&root))?;

    let closure = ctx.metadata.dependency_closure(namespace);
    debug!(namespace = %namespace.module_name, files = closure.len(), "building dependency closure");
    require_all(ctx, &closure)?;

    let digest = digest_files(ctx.engine.build_dir(), &closure)?;
    let written = write_output(ctx, target, &format!("{}\n", digest))?;
    Ok(Applied::Built(written))
  }
}
