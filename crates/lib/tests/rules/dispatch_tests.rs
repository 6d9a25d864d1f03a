//! Failure signaling through the dispatch adapter.

use std::path::Path;
use std::sync::Arc;

use nsbuild_lib::dispatch::{self, DispatchError};
use nsbuild_lib::engine::Failure;
use nsbuild_lib::metadata::SourceKind;
use nsbuild_lib::rules::{LinkRule, StampRule};
use nsbuild_lib::signal::{FailureTable, synthetic_key};

use super::common::{RecordingEngine, TestProject, context};

fn inapplicable(result: Result<std::path::PathBuf, DispatchError>) -> Failure {
  match result {
    Err(DispatchError::Inapplicable(failure)) => failure,
    other => panic!("expected an inapplicable signal, got {:?}", other),
  }
}

#[test]
fn repeated_signals_return_the_same_failure() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "");
  let config = project.config();
  let tree = project.tree(&config);
  let fake = RecordingEngine::new(&project.build_path(""));
  let ctx = context(&fake, &tree, &config);
  let failures = FailureTable::new();
  let rule = StampRule;

  let first = inapplicable(dispatch::run(&rule, &ctx, &failures, Path::new("lib/nope.stamp")));
  let second = inapplicable(dispatch::run(&rule, &ctx, &failures, Path::new("lib/nope.stamp")));

  assert!(Failure::same(&first, &second));
  assert_eq!(failures.len(), 1);
  // Only the first signal asks the engine for the synthetic target.
  assert_eq!(
    fake.requests(),
    vec![Path::new(&synthetic_key(Path::new("lib/nope.stamp"), "not a namespace")).to_path_buf()]
  );
}

#[test]
fn different_reasons_get_distinct_entries() {
  let project = TestProject::new();
  project.write_file("lib/foo/a.ml", "");
  let config = project.config();
  let tree = project.tree(&config);
  let fake = RecordingEngine::new(&project.build_path(""));
  let ctx = context(&fake, &tree, &config);
  let failures = FailureTable::new();
  let target = Path::new("lib/foo/foo__zzz.ml");

  let link = inapplicable(dispatch::run(&LinkRule::new(SourceKind::Implementation), &ctx, &failures, target));
  let signalled = nsbuild_lib::signal::signal(&failures, &fake, target, "something else");

  assert!(!Failure::same(&link, &signalled));
  assert_eq!(failures.len(), 2);
}

#[test]
fn local_engine_falls_through_and_memoizes() {
  let project = TestProject::new();
  project.write_file("lib/main.ml", "let () = ()\n");
  let engine = project.engine(project.config());

  engine.build_target(Path::new("lib/main.ml")).unwrap();
  let entries = engine.failures().len();
  assert!(entries >= 1);

  // Memoized outcomes add no new signals.
  engine.build_target(Path::new("lib/main.ml")).unwrap();
  assert_eq!(engine.failures().len(), entries);
}

#[test]
fn concurrent_signals_agree() {
  let project = TestProject::new();
  let config = project.config();
  let tree = project.tree(&config);
  let fake = Arc::new(RecordingEngine::new(&project.build_path("")));
  let failures = FailureTable::new();

  let results: Vec<Failure> = std::thread::scope(|scope| {
    let handles: Vec<_> = (0..8)
      .map(|_| {
        let fake = Arc::clone(&fake);
        let failures = &failures;
        let tree = &tree;
        let config = &config;
        scope.spawn(move || {
          let ctx = context(&fake, tree, config);
          inapplicable(dispatch::run(&StampRule, &ctx, failures, Path::new("lib/x.stamp")))
        })
      })
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  let stored = failures
    .get(&synthetic_key(Path::new("lib/x.stamp"), "not a namespace"))
    .unwrap();
  assert!(results.iter().all(|f| Failure::same(f, &stored)));
}
