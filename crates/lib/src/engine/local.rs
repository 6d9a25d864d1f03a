//! A minimal in-process host engine.
//!
//! `LocalEngine` matches targets to rules by product pattern, builds declared
//! dependencies first, memoizes every outcome and falls back to copying source
//! files from the project into the build directory. It runs one target at a
//! time and never invokes a compiler. The CLI and the end-to-end tests use it
//! to drive the namespace rules.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, trace};

use super::rule::{match_pattern, substitute};
use super::{Applied, Engine, Failure, Insertion, Outcome, Rule, RuleContext, Tags};
use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::consts::DEPENDS_SUFFIX;
use crate::dispatch::{self, DispatchError};
use crate::metadata::{MetadataError, NamespaceMetadata, NamespaceTree};
use crate::naming::strip_suffix;
use crate::rules::{self, RuleError};
use crate::signal::FailureTable;

pub struct LocalEngine {
  project_root: PathBuf,
  build_dir: PathBuf,
  rules: Vec<Box<dyn Rule>>,
  metadata: Arc<dyn NamespaceMetadata>,
  config: Config,
  failures: FailureTable,
  outcomes: Mutex<HashMap<PathBuf, Outcome>>,
  in_progress: Mutex<HashSet<PathBuf>>,
  /// Targets whose failure came from a rule error or a failed copy.
  hard_failures: Mutex<HashSet<PathBuf>>,
  tags: Mutex<HashMap<PathBuf, Tags>>,
}

impl LocalEngine {
  /// Engine with the namespace rules and the host's generic dependency rule.
  pub fn new(project_root: &Path, config: Config, metadata: Arc<dyn NamespaceMetadata>) -> Self {
    let mut rules = rules::registry();
    rules.push(Box::new(PlainDepends));
    // Top rules go first; registration order is kept otherwise.
    rules.sort_by_key(|rule| match rule.insertion() {
      Insertion::Top => 0,
      Insertion::Bottom => 1,
    });

    Self {
      project_root: project_root.to_path_buf(),
      build_dir: project_root.join(&config.build_dir),
      rules,
      metadata,
      config,
      failures: FailureTable::new(),
      outcomes: Mutex::new(HashMap::new()),
      in_progress: Mutex::new(HashSet::new()),
      hard_failures: Mutex::new(HashSet::new()),
      tags: Mutex::new(HashMap::new()),
    }
  }

  /// Scan the project's source directories and build an engine over them.
  pub fn open(project_root: &Path, config: Config) -> Result<Self, MetadataError> {
    let tree = NamespaceTree::scan(project_root, &config)?;
    Ok(Self::new(project_root, config, Arc::new(tree)))
  }

  pub fn failures(&self) -> &FailureTable {
    &self.failures
  }

  /// Build a single target.
  pub fn build_target(&self, target: &Path) -> Outcome {
    let cached = self
      .outcomes
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(target)
      .cloned();
    if let Some(outcome) = cached {
      trace!(target = %target.display(), "cached outcome");
      return outcome;
    }

    let entered = self
      .in_progress
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(target.to_path_buf());
    if !entered {
      return Err(Failure::new(target, "dependency cycle"));
    }

    let outcome = self.produce(target);

    self
      .in_progress
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(target);
    self
      .outcomes
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(target.to_path_buf(), outcome.clone());
    outcome
  }

  fn produce(&self, target: &Path) -> Outcome {
    let ctx = RuleContext {
      engine: self,
      metadata: self.metadata.as_ref(),
      config: &self.config,
    };

    // First hard failure among skipped dependencies; reported if nothing builds.
    let mut blocked: Option<Failure> = None;

    for rule in &self.rules {
      let Some(stem) = rule.products().iter().find_map(|p| match_pattern(p, target)) else {
        continue;
      };

      let dependencies: Vec<Vec<PathBuf>> = rule
        .dependencies()
        .iter()
        .map(|d| vec![substitute(d, &stem)])
        .collect();
      if let Some(failure) = self.build(&dependencies).into_iter().find_map(Result::err) {
        debug!(rule = rule.name(), target = %target.display(), %failure, "dependency failed, skipping rule");
        if blocked.is_none() && self.is_hard(&failure) {
          blocked = Some(failure);
        }
        continue;
      }

      debug!(rule = rule.name(), target = %target.display(), "applying rule");
      match dispatch::run(rule.as_ref(), &ctx, &self.failures, target) {
        Ok(path) => return Ok(path),
        Err(DispatchError::Inapplicable(_)) => continue,
        Err(DispatchError::Rule(e)) => {
          self.mark_hard(target);
          return Err(Failure::new(target, format!("{}: {}", rule.name(), e)));
        }
      }
    }

    match (self.copy_source(target), blocked) {
      (Err(_), Some(failure)) => Err(failure),
      (outcome, _) => outcome,
    }
  }

  fn is_hard(&self, failure: &Failure) -> bool {
    self
      .hard_failures
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains(failure.target())
  }

  fn mark_hard(&self, target: &Path) {
    self
      .hard_failures
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(target.to_path_buf());
  }

  fn copy_source(&self, target: &Path) -> Outcome {
    let source = self.project_root.join(target);
    if !source.is_file() {
      return Err(Failure::new(target, "no rule to build target"));
    }

    let dest = self.build_dir.join(target);
    let copied = match dest.parent() {
      Some(parent) => std::fs::create_dir_all(parent),
      None => Ok(()),
    }
    .and_then(|_| std::fs::copy(&source, &dest));
    match copied {
      Ok(_) => {
        debug!(target = %target.display(), "copied source");
        Ok(target.to_path_buf())
      }
      Err(e) => {
        self.mark_hard(target);
        Err(Failure::new(target, format!("failed to copy source: {}", e)))
      }
    }
  }
}

impl Engine for LocalEngine {
  fn build(&self, batches: &[Vec<PathBuf>]) -> Vec<Outcome> {
    batches
      .iter()
      .map(|batch| {
        let mut outcome = Err(Failure::new(PathBuf::new(), "empty batch"));
        for target in batch {
          outcome = self.build_target(target);
          if outcome.is_ok() {
            break;
          }
        }
        outcome
      })
      .collect()
  }

  fn tags(&self, path: &Path) -> Tags {
    let mut tags: Tags = path
      .to_str()
      .and_then(|key| self.config.tags.get(key))
      .map(|configured| configured.iter().cloned().collect())
      .unwrap_or_default();
    if let Some(attached) = self.tags.lock().unwrap_or_else(PoisonError::into_inner).get(path) {
      tags.extend(attached.iter().cloned());
    }
    tags
  }

  fn tag(&self, path: &Path, tags: &Tags) {
    let mut attached = self.tags.lock().unwrap_or_else(PoisonError::into_inner);
    attached
      .entry(path.to_path_buf())
      .or_default()
      .extend(tags.iter().cloned());
  }

  fn build_dir(&self) -> &Path {
    &self.build_dir
  }
}

/// The host's own dependency rule: analyzer output written as is.
///
/// Handles every `.depends` target the namespace rules turn down, such as the
/// generated alias and root modules.
struct PlainDepends;

impl Rule for PlainDepends {
  fn name(&self) -> &str {
    "plain depends"
  }

  fn products(&self) -> Vec<String> {
    vec![format!("%{}", DEPENDS_SUFFIX)]
  }

  fn dependencies(&self) -> Vec<String> {
    vec!["%".to_string()]
  }

  fn apply(&self, ctx: &RuleContext<'_>, target: &Path) -> Result<Applied, RuleError> {
    let source =
      strip_suffix(target, DEPENDS_SUFFIX).ok_or_else(|| RuleError::NotNamespacedFile(target.to_path_buf()))?;
    let tags = ctx.engine.tags(&source);
    let raw = Analyzer::new(&ctx.config.analyzer).analyze(ctx.engine.build_dir(), &source, &tags)?;
    let line = format!("{}: {}\n", source.display(), raw.dependencies.join(" "));

    let path = ctx.output_path(target);
    std::fs::write(&path, line).map_err(|source| RuleError::Io {
      path: path.clone(),
      source,
    })?;
    info!(target = %target.display(), "wrote");
    Ok(Applied::Built(target.to_path_buf()))
  }
}
