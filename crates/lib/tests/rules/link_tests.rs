//! Link rule: virtual paths forward to the real file and share its tags.

use std::path::{Path, PathBuf};

use nsbuild_lib::engine::{Engine, Failure, Rule};
use nsbuild_lib::metadata::{NamespaceMetadata, SourceKind};
use nsbuild_lib::rules::{LinkRule, RuleError};

use super::common::{RecordingEngine, TestProject, context, tags};

#[test]
fn link_copies_tags_from_original() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "let x = 1\n");
  let mut config = project.config();
  config
    .tags
    .insert("lib/foo/a.ml".to_string(), vec!["debug".to_string(), "warn(-32)".to_string()]);
  let engine = project.engine(config);

  engine.build_target(Path::new("lib/foo/foo__a.ml")).unwrap();

  assert_eq!(engine.tags(Path::new("lib/foo/foo__a.ml")), tags(&["debug", "warn(-32)"]));
  assert_eq!(project.read_build("lib/foo/foo__a.ml"), "let x = 1\n");
}

#[test]
fn interface_links_separately() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "let x = 1\n");
  project.write_file("lib/foo/a.mli", "val x : int\n");
  let engine = project.engine(project.config());

  engine.build_target(Path::new("lib/foo/foo__a.mli")).unwrap();

  let link = std::fs::read_link(project.build_path("lib/foo/foo__a.mli")).unwrap();
  assert_eq!(link, Path::new("a.mli"));
  assert!(!project.build_path("lib/foo/foo__a.ml").exists());
}

#[test]
fn virtual_paths_round_trip_to_originals() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "");
  project.write_file("lib/foo/bar/c.mli", "");
  let config = project.config();
  let tree = project.tree(&config);

  for file in tree.files() {
    let found = tree.file_by_virtual_path(&file.virtual_path).unwrap();
    assert_eq!(tree.original_path(found), file.original_path.as_path());
  }
  assert_eq!(tree.files().count(), 2);
}

#[test]
fn unknown_virtual_path_is_not_namespaced() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "");
  let config = project.config();
  let tree = project.tree(&config);
  let fake = RecordingEngine::new(&project.build_path(""));
  let ctx = context(&fake, &tree, &config);

  let rule = LinkRule::new(SourceKind::Implementation);
  let result = rule.apply(&ctx, Path::new("lib/foo/foo__zzz.ml"));
  assert!(matches!(result, Err(RuleError::NotNamespacedFile(_))));

  // An interface rule does not take an implementation path.
  let rule = LinkRule::new(SourceKind::Interface);
  let result = rule.apply(&ctx, Path::new("lib/foo/foo__a.ml"));
  assert!(matches!(result, Err(RuleError::NotNamespacedFile(_))));
  assert!(fake.requests().is_empty());
}

#[test]
fn failed_original_is_a_hard_error() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "");
  let config = project.config();
  let tree = project.tree(&config);
  let fake = RecordingEngine::new(&project.build_path(""));
  let ctx = context(&fake, &tree, &config);

  let rule = LinkRule::new(SourceKind::Implementation);
  let error = rule.apply(&ctx, Path::new("lib/foo/foo__a.ml")).unwrap_err();

  assert!(matches!(error, RuleError::DependencyFailed { .. }));
  assert!(!error.is_recoverable());
  assert_eq!(fake.requests(), vec![PathBuf::from("lib/foo/a.ml")]);
}

#[cfg(unix)]
#[test]
fn link_error_surfaces_through_dependents() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "let x = 1\n");
  // A directory where the link has to go cannot be replaced.
  project.write_file("_build/lib/foo/foo__a.ml/stale", "");
  let engine = project.engine(project.config());

  let link = engine.build_target(Path::new("lib/foo/foo__a.ml")).unwrap_err();
  assert!(link.message().starts_with("link ml:"), "{}", link.message());

  let depends = engine.build_target(Path::new("lib/foo/foo__a.ml.depends")).unwrap_err();
  assert!(Failure::same(&depends, &link), "{}", depends.message());
}
