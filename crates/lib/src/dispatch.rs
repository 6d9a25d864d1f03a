//! Adapter between rule results and engine failures.
//!
//! Rules say they do not apply by returning [`Applied::Inapplicable`] or one
//! of the recoverable [`RuleError`]s. Both are turned into a memoized engine
//! failure here, so the host can try its next rule. Every other error is a
//! hard failure and comes back untouched.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::{Applied, Failure, Rule, RuleContext};
use crate::rules::RuleError;
use crate::signal::{FailureTable, signal};

#[derive(Debug, Error)]
pub enum DispatchError {
  #[error("rule does not apply: {0}")]
  Inapplicable(Failure),

  #[error(transparent)]
  Rule(#[from] RuleError),
}

/// Apply `rule` to `target`.
pub fn run(
  rule: &dyn Rule,
  ctx: &RuleContext<'_>,
  failures: &FailureTable,
  target: &Path,
) -> Result<PathBuf, DispatchError> {
  let reason = match rule.apply(ctx, target) {
    Ok(Applied::Built(path)) => return Ok(path),
    Ok(Applied::Inapplicable(reason)) => reason,
    Err(e) => match e.inapplicable_reason() {
      Some(reason) => reason.to_string(),
      None => return Err(DispatchError::Rule(e)),
    },
  };

  Err(DispatchError::Inapplicable(signal(failures, ctx.engine, target, &reason)))
}
