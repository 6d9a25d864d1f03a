//! Namespaces command implementation.
//!
//! Lists every namespace found under the configured source directories with
//! its members and, once built, its current digest.

use std::path::Path;

use anyhow::{Context, Result};

use nsbuild_lib::config::Config;
use nsbuild_lib::consts::STAMP_EXT;
use nsbuild_lib::metadata::{NamespaceMetadata, NamespaceTree};

use crate::output::{print_info, print_json, print_stat, print_warning, symbols, truncate_digest};

pub fn cmd_namespaces(project: &Path, json: bool, verbose: bool) -> Result<()> {
  let config = Config::load(project).context("Failed to load configuration")?;
  let tree = NamespaceTree::scan(project, &config).context("Failed to scan source directories")?;
  let build_dir = project.join(&config.build_dir);

  let digest_of = |root: &Path| {
    std::fs::read_to_string(build_dir.join(root.with_extension(STAMP_EXT)))
      .ok()
      .map(|s| s.trim().to_string())
  };

  if json {
    let list: Vec<_> = tree
      .namespaces()
      .map(|ns| {
        serde_json::json!({
          "namespace": ns,
          "members": tree.members(ns),
          "library": tree.is_library(ns),
          "digest": digest_of(&ns.root_path),
        })
      })
      .collect();
    return print_json(&list);
  }

  if tree.namespaces().next().is_none() {
    print_warning("No namespaces found");
    return Ok(());
  }

  for ns in tree.namespaces() {
    print_info(&format!("{} ({})", ns.module_name, ns.dir.display()));
    print_stat("Root", &ns.root_file().display().to_string());
    if tree.is_library(ns) {
      print_stat("Library", ns.library_name());
    }
    if let Some(digest) = digest_of(&ns.root_path) {
      print_stat("Digest", truncate_digest(&digest));
    }

    let members = tree.members(ns);
    if verbose {
      for member in &members {
        println!("    {} {} {}", member.name, symbols::ARROW, member.target);
      }
    } else {
      let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
      print_stat("Members", &names.join(", "));
    }
  }

  Ok(())
}
