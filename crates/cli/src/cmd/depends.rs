use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use nsbuild_lib::config::Config;
use nsbuild_lib::consts::DEPENDS_SUFFIX;
use nsbuild_lib::engine::Engine;
use nsbuild_lib::engine::local::LocalEngine;
use nsbuild_lib::metadata::{NamespaceMetadata, NamespaceTree};
use nsbuild_lib::naming::with_suffix;

/// Run the dependency filter on one namespaced file and print its line.
///
/// `file` may be the virtual path (`lib/foo/foo__b.ml`) or the original one
/// (`lib/foo/b.ml`).
pub fn cmd_depends(project: &Path, file: &Path) -> Result<()> {
  let config = Config::load(project).context("Failed to load configuration")?;
  let tree = Arc::new(NamespaceTree::scan(project, &config).context("Failed to scan source directories")?);

  let virtual_path = tree
    .file_by_virtual_path(file)
    .or_else(|| tree.files().find(|f| f.original_path == file))
    .map(|found| found.virtual_path.clone())
    .ok_or_else(|| anyhow!("{} is not a namespaced file", file.display()))?;

  let engine = LocalEngine::new(project, config, tree);
  let target = with_suffix(&virtual_path, DEPENDS_SUFFIX);
  engine.build_target(&target)?;

  let path = engine.build_dir().join(&target);
  let line = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  print!("{}", line);
  Ok(())
}
