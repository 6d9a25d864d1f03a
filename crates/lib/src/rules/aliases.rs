//! Alias aggregate generator: `R___aliases.ml`.

use std::path::Path;

use super::{RuleError, alias_lines, namespace_at, write_output};
use crate::consts::{ALIASES_SUFFIX, IMPL_EXT};
use crate::engine::rule::match_pattern;
use crate::engine::{Applied, Rule, RuleContext};

/// Re-exports every direct member of a namespace under its short name.
///
/// Regenerated whenever requested; the content only depends on metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasesRule;

impl AliasesRule {
  fn product() -> String {
    format!("%{}.{}", ALIASES_SUFFIX, IMPL_EXT)
  }
}

impl Rule for AliasesRule {
  fn name(&self) -> &str {
    "namespace aliases"
  }

  fn products(&self) -> Vec<String> {
    vec![Self::product()]
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    let root = match_pattern(&Self::product(), target).ok_or_else(|| RuleError::NotANamespace(target.to_path_buf()))?;
    let namespace = namespace_at(ctx, Path::new(&root))?;

    let content = alias_lines(&ctx.metadata.members(namespace));
    Ok(Applied::Built(write_output(ctx, target, &content)?))
  }
}
