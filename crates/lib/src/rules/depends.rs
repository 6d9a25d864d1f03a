//! Dependency filter.
//!
//! Intercepts `%.ml.depends` and `%.mli.depends` for namespaced files. The
//! analyzer runs on the virtual file inside the build directory and every
//! module it reports is mapped into the flat module space, so the host sees
//! `Foo__a` where the source says `A`.

use std::path::Path;

use tracing::debug;

use super::{RuleError, write_output};
use crate::analyzer::Analyzer;
use crate::consts::DEPENDS_SUFFIX;
use crate::engine::rule::match_pattern;
use crate::engine::{Applied, Insertion, Rule, RuleContext};
use crate::metadata::SourceKind;
use crate::naming::strip_suffix;

#[derive(Debug, Clone, Copy)]
pub struct DependsRule {
  kind: SourceKind,
  name: &'static str,
}

impl DependsRule {
  pub fn new(kind: SourceKind) -> Self {
    let name = match kind {
      SourceKind::Implementation => "depends ml",
      SourceKind::Interface => "depends mli",
    };
    Self { kind, name }
  }

  fn source_pattern(&self) -> String {
    format!("%.{}", self.kind.extension())
  }

  fn product(&self) -> String {
    format!("{}{}", self.source_pattern(), DEPENDS_SUFFIX)
  }
}

impl Rule for DependsRule {
  fn name(&self) -> &str {
    self.name
  }

  fn products(&self) -> Vec<String> {
    vec![self.product()]
  }

  fn dependencies(&self) -> Vec<String> {
    vec![self.source_pattern()]
  }

  fn insertion(&self) -> Insertion {
    Insertion::Top
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    if match_pattern(&self.product(), target).is_none() {
      return Err(RuleError::NotNamespacedFile(target.to_path_buf()));
    }
    let source =
      strip_suffix(target, DEPENDS_SUFFIX).ok_or_else(|| RuleError::NotNamespacedFile(target.to_path_buf()))?;
    let file = ctx
      .metadata
      .file_by_virtual_path(&source)
      .filter(|file| file.kind == self.kind)
      .ok_or(RuleError::NotNamespacedFile(source))?;

    let tags = ctx.engine.tags(&file.virtual_path);
    let analyzer = Analyzer::new(&ctx.config.analyzer);
    let raw = analyzer.analyze(ctx.engine.build_dir(), &file.virtual_path, &tags)?;
    let resolved = raw.resolve(ctx.metadata, file);
    debug!(
      file = %file.virtual_path.display(),
      raw = ?raw.dependencies,
      resolved = ?resolved.dependencies,
      "resolved dependencies"
    );

    Ok(Applied::Built(write_output(ctx, target, &format!("{}\n", resolved))?))
  }
}
