//! Namespace metadata.
//!
//! Rules consume namespace metadata only through [`NamespaceMetadata`], which
//! maps directories to namespaces and virtual paths to the real files behind
//! them. [`NamespaceTree`] is the implementation built from the project's
//! source directories.

mod tree;
mod types;

use std::path::{Path, PathBuf};

pub use tree::{MetadataError, NamespaceTree};
pub use types::*;

pub trait NamespaceMetadata: Send + Sync {
  /// The namespace a directory stands for.
  fn namespace_of(&self, dir: &Path) -> Option<&Namespace>;

  /// Files that must be up to date before the namespace root is generated,
  /// in a stable order.
  fn dependency_closure(&self, namespace: &Namespace) -> Vec<PathBuf>;

  /// Direct members, in the order their aliases are emitted.
  fn members(&self, namespace: &Namespace) -> Vec<Member>;

  /// Library member module paths (without extension), or `None` if the
  /// namespace is not declared as a library.
  fn library_members(&self, namespace: &Namespace) -> Option<Vec<String>>;

  fn file_by_virtual_path(&self, path: &Path) -> Option<&NamespacedFile>;

  /// Flattened module name for a raw module reference made from `file`, or
  /// `None` if the reference leaves the namespace system.
  fn resolve(&self, file: &NamespacedFile, raw: &str) -> Option<String>;

  fn original_path<'a>(&self, file: &'a NamespacedFile) -> &'a Path {
    &file.original_path
  }

  /// Libraries an executable (path without extension) links statically.
  fn executable_libraries(&self, target: &Path) -> Vec<String>;
}
