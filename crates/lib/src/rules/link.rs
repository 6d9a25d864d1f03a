//! Link rule: exposes a virtual (flattened) source path as a build target.
//!
//! The original file is built first and its tags are copied onto the virtual
//! path, so both compile with the same flags. The virtual path is then made a
//! symbolic link to the original's file name in the same directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{RuleError, require_all};
use crate::engine::{Applied, Rule, RuleContext};
use crate::metadata::SourceKind;
use crate::util::link::replace_link;

#[derive(Debug, Clone, Copy)]
pub struct LinkRule {
  kind: SourceKind,
  name: &'static str,
}

impl LinkRule {
  pub fn new(kind: SourceKind) -> Self {
    let name = match kind {
      SourceKind::Implementation => "link ml",
      SourceKind::Interface => "link mli",
    };
    Self { kind, name }
  }
}

impl Rule for LinkRule {
  fn name(&self) -> &str {
    self.name
  }

  fn products(&self) -> Vec<String> {
    vec![format!("%.{}", self.kind.extension())]
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    let file = ctx
      .metadata
      .file_by_virtual_path(target)
      .filter(|file| file.kind == self.kind)
      .ok_or_else(|| RuleError::NotNamespacedFile(target.to_path_buf()))?;
    let original = ctx.metadata.original_path(file);

    require_all(ctx, &[original.to_path_buf()])?;

    let tags = ctx.engine.tags(original);
    debug!(target = %target.display(), original = %original.display(), tags = ?tags, "copying tags");
    ctx.engine.tag(target, &tags);

    let basename = original
      .file_name()
      .map(PathBuf::from)
      .ok_or_else(|| RuleError::NotNamespacedFile(target.to_path_buf()))?;
    let link = ctx.output_path(target);
    replace_link(&basename, &link).map_err(|source| RuleError::Io { path: link, source })?;

    Ok(Applied::Built(target.to_path_buf()))
  }
}
