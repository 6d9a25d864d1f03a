//! Executable library tagging.
//!
//! Runs ahead of the host's linking rules for `%.byte` and `%.native`. It tags
//! the executable with the libraries it links and then reports itself
//! inapplicable, so the host goes on to link the executable with those tags
//! in place.

use std::path::Path;

use tracing::info;

use super::RuleError;
use crate::consts::EXECUTABLE_TAGGED;
use crate::engine::{Applied, Insertion, Rule, RuleContext, Tags};

#[derive(Debug, Clone)]
pub struct ExecutableTagRule {
  extension: &'static str,
  name: String,
}

impl ExecutableTagRule {
  pub fn new(extension: &'static str) -> Self {
    Self {
      extension,
      name: format!("executable tags {}", extension),
    }
  }
}

impl Rule for ExecutableTagRule {
  fn name(&self) -> &str {
    &self.name
  }

  fn products(&self) -> Vec<String> {
    vec![format!("%.{}", self.extension)]
  }

  fn insertion(&self) -> Insertion {
    Insertion::Top
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    let libraries: Tags = ctx.metadata.executable_libraries(target).into_iter().collect();
    if !libraries.is_empty() {
      info!(target = %target.display(), libraries = ?libraries, "tagging executable");
      ctx.engine.tag(target, &libraries);
    }
    Ok(Applied::Inapplicable(EXECUTABLE_TAGGED.to_string()))
  }
}
