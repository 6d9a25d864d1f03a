//! Shared helpers for rule integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nsbuild_lib::config::Config;
use nsbuild_lib::engine::local::LocalEngine;
use nsbuild_lib::engine::{Engine, Failure, Outcome, RuleContext, Tags};
use nsbuild_lib::metadata::NamespaceTree;
use tempfile::TempDir;

pub const FAKE_ANALYZER: &str = include_str!("../fixtures/fake-ocamldep.sh");

/// A throwaway project with sources under `lib/`.
pub struct TestProject {
  pub temp: TempDir,
}

impl TestProject {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn build_path(&self, relative_path: &str) -> PathBuf {
    self.root().join("_build").join(relative_path)
  }

  pub fn read_build(&self, relative_path: &str) -> String {
    let path = self.build_path(relative_path);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
  }

  /// Config with `lib` as the only source root.
  pub fn config(&self) -> Config {
    Config {
      source_dirs: vec![PathBuf::from("lib")],
      ..Config::default()
    }
  }

  pub fn engine(&self, config: Config) -> LocalEngine {
    LocalEngine::open(self.root(), config).unwrap()
  }

  pub fn tree(&self, config: &Config) -> NamespaceTree {
    NamespaceTree::scan(self.root(), config).unwrap()
  }

  /// Install the fake `ocamldep` fixture and return its path.
  #[cfg(unix)]
  pub fn fake_analyzer(&self) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = self.root().join("fake-ocamldep");
    std::fs::write(&path, FAKE_ANALYZER).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
  }
}

/// Engine that records every request and fails every build.
#[derive(Default)]
pub struct RecordingEngine {
  pub requests: Mutex<Vec<PathBuf>>,
  pub attached: Mutex<HashMap<PathBuf, Tags>>,
  build_dir: PathBuf,
}

impl RecordingEngine {
  pub fn new(build_dir: &Path) -> Self {
    Self {
      build_dir: build_dir.to_path_buf(),
      ..Default::default()
    }
  }

  pub fn requests(&self) -> Vec<PathBuf> {
    self.requests.lock().unwrap().clone()
  }
}

impl Engine for RecordingEngine {
  fn build(&self, batches: &[Vec<PathBuf>]) -> Vec<Outcome> {
    batches
      .iter()
      .map(|batch| {
        self.requests.lock().unwrap().extend(batch.iter().cloned());
        Err(Failure::new(batch[0].clone(), "no rule"))
      })
      .collect()
  }

  fn tags(&self, path: &Path) -> Tags {
    self.attached.lock().unwrap().get(path).cloned().unwrap_or_default()
  }

  fn tag(&self, path: &Path, tags: &Tags) {
    self
      .attached
      .lock()
      .unwrap()
      .entry(path.to_path_buf())
      .or_default()
      .extend(tags.iter().cloned());
  }

  fn build_dir(&self) -> &Path {
    &self.build_dir
  }
}

/// Context over a fake engine and a scanned tree.
pub fn context<'a>(engine: &'a RecordingEngine, tree: &'a NamespaceTree, config: &'a Config) -> RuleContext<'a> {
  RuleContext {
    engine,
    metadata: tree,
    config,
  }
}

pub fn tags(items: &[&str]) -> Tags {
  items.iter().map(|s| s.to_string()).collect()
}
