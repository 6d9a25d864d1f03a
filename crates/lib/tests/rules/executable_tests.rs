//! Executable tagging: attach library tags, then step aside.

use std::path::{Path, PathBuf};

use nsbuild_lib::config::ExecutableConfig;
use nsbuild_lib::consts::{BYTE_EXT, EXECUTABLE_TAGGED, NATIVE_EXT};
use nsbuild_lib::dispatch::{self, DispatchError};
use nsbuild_lib::engine::{Applied, Engine, Rule};
use nsbuild_lib::rules::ExecutableTagRule;
use nsbuild_lib::signal::FailureTable;

use super::common::{RecordingEngine, TestProject, context, tags};

fn project_with_executable() -> (TestProject, nsbuild_lib::config::Config) {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "");
  let mut config = project.config();
  config.libraries = vec![PathBuf::from("lib/foo")];
  config.executables = vec![ExecutableConfig {
    target: PathBuf::from("bin/main"),
    libraries: vec!["foo".to_string()],
  }];
  (project, config)
}

#[test]
fn tags_then_reports_inapplicable() {
  let (project, config) = project_with_executable();
  let tree = project.tree(&config);
  let fake = RecordingEngine::new(&project.build_path(""));
  let ctx = context(&fake, &tree, &config);

  for ext in [BYTE_EXT, NATIVE_EXT] {
    let target = PathBuf::from(format!("bin/main.{}", ext));
    let applied = ExecutableTagRule::new(ext).apply(&ctx, &target).unwrap();

    assert_eq!(applied, Applied::Inapplicable(EXECUTABLE_TAGGED.to_string()));
    assert_eq!(fake.tags(&target), tags(&["foo"]));
  }
}

#[test]
fn tagging_is_idempotent_and_survives_the_signal() {
  let (project, config) = project_with_executable();
  let tree = project.tree(&config);
  let fake = RecordingEngine::new(&project.build_path(""));
  let ctx = context(&fake, &tree, &config);
  let failures = FailureTable::new();
  let rule = ExecutableTagRule::new(NATIVE_EXT);
  let target = Path::new("bin/main.native");

  for _ in 0..2 {
    let result = dispatch::run(&rule, &ctx, &failures, target);
    assert!(matches!(result, Err(DispatchError::Inapplicable(_))));
  }

  assert_eq!(fake.tags(target), tags(&["foo"]));
  assert_eq!(failures.len(), 1);
}

#[test]
fn executable_without_libraries_gets_no_tags() {
  let (project, config) = project_with_executable();
  let tree = project.tree(&config);
  let fake = RecordingEngine::new(&project.build_path(""));
  let ctx = context(&fake, &tree, &config);

  let applied = ExecutableTagRule::new(BYTE_EXT)
    .apply(&ctx, Path::new("bin/other.byte"))
    .unwrap();

  assert!(matches!(applied, Applied::Inapplicable(_)));
  assert!(fake.tags(Path::new("bin/other.byte")).is_empty());
}

#[test]
fn local_engine_keeps_tags_after_fallthrough() {
  let (project, config) = project_with_executable();
  let engine = project.engine(config);

  // Nothing links executables locally, but the tags stay attached.
  assert!(engine.build_target(Path::new("bin/main.native")).is_err());
  assert_eq!(engine.tags(Path::new("bin/main.native")), tags(&["foo"]));
}
