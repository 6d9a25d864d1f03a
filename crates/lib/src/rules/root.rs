//! Namespace root module: `R.ml`.
//!
//! The generated module re-exports the namespace's members and carries the
//! namespace digest in a header comment. A changed digest therefore changes
//! the file's content even when the member list did not change, which makes
//! the compiler rebuild the root and everything that depends on it.

use std::path::Path;

use super::{RuleError, alias_lines, namespace_at, write_output};
use crate::consts::{IMPL_EXT, STAMP_EXT};
use crate::engine::rule::match_pattern;
use crate::engine::{Applied, Rule, RuleContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct RootRule;

impl RootRule {
  fn product() -> String {
    format!("%.{}", IMPL_EXT)
  }
}

/// Render the root module of `module_name` from its digest and alias lines.
pub fn render(module_name: &str, digest: &str, aliases: &str) -> String {
  format!("(* namespace {}, digest {} *)\n{}", module_name, digest, aliases)
}

impl Rule for RootRule {
  fn name(&self) -> &str {
    "namespace root"
  }

  fn products(&self) -> Vec<String> {
    vec![Self::product()]
  }

  fn dependencies(&self) -> Vec<String> {
    vec![format!("%.{}", STAMP_EXT)]
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    let root = match_pattern(&Self::product(), target).ok_or_else(|| RuleError::NotANamespace(target.to_path_buf()))?;
    let namespace = namespace_at(ctx, Path::new(&root))?;

    let stamp = ctx.output_path(&Path::new(&root).with_extension(STAMP_EXT));
    let digest = std::fs::read_to_string(&stamp).map_err(|source| RuleError::Io { path: stamp, source })?;

    let content = render(
      &namespace.module_name,
      digest.trim(),
      &alias_lines(&ctx.metadata.members(namespace)),
    );
    Ok(Applied::Built(write_output(ctx, target, &content)?))
  }
}
