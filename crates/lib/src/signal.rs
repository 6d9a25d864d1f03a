//! Failure signaling for inapplicable rules.
//!
//! A rule that does not apply to a target has to fail in a way the host engine
//! understands. Signaling builds a synthetic target that no rule can produce
//! and hands back the failure the engine reports for it. The failure is
//! memoized per `(target, message)`, so repeated signals return the very same
//! failure object and the engine's own failure caching stays deterministic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::consts::{FAILURE_KEY_CLOSE, FAILURE_KEY_FILLER, FAILURE_KEY_OPEN};
use crate::engine::{Engine, Failure};

/// Failures captured so far, keyed by synthetic target.
///
/// Created once per engine process and never cleared. Lookups and inserts are
/// safe from concurrent rule invocations; an entry is only visible once it is
/// complete.
#[derive(Debug, Default)]
pub struct FailureTable {
  entries: RwLock<HashMap<String, Failure>>,
}

impl FailureTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<Failure> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    entries.get(key).cloned()
  }

  /// Store `failure` under `key` unless another caller got there first, and
  /// return whichever failure is stored.
  pub fn insert(&self, key: String, failure: Failure) -> Failure {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.entry(key).or_insert(failure).clone()
  }

  pub fn len(&self) -> usize {
    self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Synthetic target naming the failure of `target` for `message`.
///
/// Whitespace and colons in the message become the filler character, so the
/// last colon in the key always separates target from message.
pub fn synthetic_key(target: &Path, message: &str) -> String {
  let message: String = message
    .chars()
    .map(|c| if c.is_whitespace() || c == ':' { FAILURE_KEY_FILLER } else { c })
    .collect();
  format!("{}{}:{}{}", FAILURE_KEY_OPEN, target.display(), message, FAILURE_KEY_CLOSE)
}

/// Signal that a rule does not apply to `target`.
///
/// Returns the failure to report to the engine. The first signal for a given
/// `(target, message)` asks the engine to build the synthetic key and captures
/// the failure it reports; later signals return that same failure.
pub fn signal(table: &FailureTable, engine: &dyn Engine, target: &Path, message: &str) -> Failure {
  let key = synthetic_key(target, message);

  if let Some(failure) = table.get(&key) {
    debug!(target = %target.display(), message, "re-signaling memoized failure");
    return failure;
  }

  let outcome = engine.build(&[vec![PathBuf::from(&key)]]).into_iter().next();
  let failure = match outcome {
    Some(Err(failure)) => failure,
    Some(Ok(path)) => {
      warn!(key = %key, path = %path.display(), "synthetic failure target unexpectedly built");
      Failure::new(&key, message)
    }
    None => Failure::new(&key, message),
  };

  debug!(target = %target.display(), message, "signaling rule inapplicable");
  table.insert(key, failure)
}
