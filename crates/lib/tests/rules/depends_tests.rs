//! Dependency filter: analyzer output rewritten into the flat module space.

#![cfg(unix)]

use std::path::Path;

use nsbuild_lib::config::Config;

use super::common::TestProject;

fn analyzed_project(files: &[(&str, &str)]) -> (TestProject, Config) {
  let project = TestProject::new();
  for (path, content) in files {
    project.write_file(path, content);
  }
  let mut config = project.config();
  config.analyzer.program = project.fake_analyzer();
  (project, config)
}

#[test]
fn sibling_reference_resolves_to_flat_name() {
  let (project, config) = analyzed_project(&[("lib/foo/a.ml", "let x = 1\n"), ("lib/foo/b.ml", "let y = A.x\n")]);
  let engine = project.engine(config);

  engine.build_target(Path::new("lib/foo/foo__b.ml.depends")).unwrap();

  assert_eq!(project.read_build("lib/foo/foo__b.ml.depends"), "lib/foo/foo__b.ml: Foo__a\n");
}

#[test]
fn no_dependencies_keeps_the_separator() {
  let (project, config) = analyzed_project(&[("lib/foo/a.ml", "let x = 1\n")]);
  let engine = project.engine(config);

  engine.build_target(Path::new("lib/foo/foo__a.ml.depends")).unwrap();

  assert_eq!(project.read_build("lib/foo/foo__a.ml.depends"), "lib/foo/foo__a.ml: \n");
}

#[test]
fn unknown_modules_pass_through_in_order() {
  let (project, config) = analyzed_project(&[
    ("lib/foo/a.ml", "let x = 1\n"),
    ("lib/foo/b.ml", "let y = A.x + List.length [] + Zed.z\n"),
  ]);
  let engine = project.engine(config);

  engine.build_target(Path::new("lib/foo/foo__b.ml.depends")).unwrap();

  assert_eq!(
    project.read_build("lib/foo/foo__b.ml.depends"),
    "lib/foo/foo__b.ml: Foo__a List Zed\n"
  );
}

#[test]
fn enclosing_and_top_level_namespaces_resolve() {
  let (project, config) = analyzed_project(&[
    ("lib/foo/a.ml", "let x = 1\n"),
    ("lib/foo/bar/c.ml", "let z = A.x + Foo.A.x\n"),
  ]);
  let engine = project.engine(config);

  engine.build_target(Path::new("lib/foo/bar/foo__bar__c.ml.depends")).unwrap();

  assert_eq!(
    project.read_build("lib/foo/bar/foo__bar__c.ml.depends"),
    "lib/foo/bar/foo__bar__c.ml: Foo__a Foo\n"
  );
}

#[test]
fn interface_dependencies_use_their_own_artifact() {
  let (project, config) = analyzed_project(&[
    ("lib/foo/a.ml", "type t = int\n"),
    ("lib/foo/b.mli", "val y : A.t\n"),
  ]);
  let engine = project.engine(config);

  engine.build_target(Path::new("lib/foo/foo__b.mli.depends")).unwrap();

  assert_eq!(project.read_build("lib/foo/foo__b.mli.depends"), "lib/foo/foo__b.mli: Foo__a\n");
}

#[test]
fn non_namespaced_file_falls_back_to_plain_analysis() {
  let (project, config) = analyzed_project(&[("lib/foo/a.ml", "let x = 1\n"), ("lib/main.ml", "let () = Foo.A.x\n")]);
  let engine = project.engine(config);

  engine.build_target(Path::new("lib/main.ml.depends")).unwrap();

  assert_eq!(project.read_build("lib/main.ml.depends"), "lib/main.ml: A Foo\n");
}

#[test]
fn analyzer_failure_is_not_swallowed() {
  let (project, mut config) = analyzed_project(&[("lib/foo/a.ml", "let x = 1\n")]);
  config.analyzer.program = project.root().join("does-not-exist").to_string_lossy().into_owned();
  let engine = project.engine(config);

  let failure = engine.build_target(Path::new("lib/foo/foo__a.ml.depends")).unwrap_err();

  assert!(failure.message().starts_with("depends ml:"), "{}", failure.message());
  assert!(!project.build_path("lib/foo/foo__a.ml.depends").exists());
}
