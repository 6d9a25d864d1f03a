//! Test utilities for nsbuild-lib.

use std::path::{Path, PathBuf};

/// Stand-in for `ocamldep -modules`, shared with the integration tests.
#[cfg(unix)]
pub const FAKE_ANALYZER: &str = include_str!("../../tests/fixtures/fake-ocamldep.sh");

/// Write `contents` into `dir` as an executable file and return its path.
#[cfg(unix)]
pub fn install_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, contents).unwrap();
  let mut perms = std::fs::metadata(&path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(&path, perms).unwrap();
  path
}

/// Write a `/bin/sh` script with `body` into `dir` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  install_script(dir, name, &format!("#!/bin/sh\n{}\n", body))
}

#[cfg(unix)]
pub fn fake_analyzer(dir: &Path) -> PathBuf {
  install_script(dir, "fake-ocamldep", FAKE_ANALYZER)
}
