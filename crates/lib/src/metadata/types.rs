use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{IMPL_EXT, INTF_EXT};

/// Interface or implementation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
  Interface,
  Implementation,
}

impl SourceKind {
  pub fn extension(self) -> &'static str {
    match self {
      SourceKind::Interface => INTF_EXT,
      SourceKind::Implementation => IMPL_EXT,
    }
  }

  pub fn of_path(path: &Path) -> Option<Self> {
    match path.extension()?.to_str()? {
      INTF_EXT => Some(SourceKind::Interface),
      IMPL_EXT => Some(SourceKind::Implementation),
      _ => None,
    }
  }
}

/// A directory given build-system identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
  /// Directory, relative to the project root.
  pub dir: PathBuf,

  /// Path components below the source root, outermost first.
  pub components: Vec<String>,

  /// Components joined with the separator, e.g. `foo__bar`.
  pub flat_name: String,

  /// Capitalized flat name, e.g. `Foo__bar`.
  pub module_name: String,

  /// Key of every generated artifact, e.g. `lib/foo/foo__bar`.
  pub root_path: PathBuf,

  /// Enclosing namespace directory, if any.
  pub parent: Option<PathBuf>,
}

impl Namespace {
  /// Generated root module source, e.g. `lib/foo/foo__bar.ml`.
  pub fn root_file(&self) -> PathBuf {
    self.root_path.with_extension(IMPL_EXT)
  }

  /// Library name: the flat name.
  pub fn library_name(&self) -> &str {
    &self.flat_name
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
  Module,
  Namespace,
}

/// A direct member of a namespace, as seen from inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
  /// Short module name, e.g. `A`.
  pub name: String,

  /// Flattened module the short name stands for, e.g. `Foo__a`.
  pub target: String,

  pub kind: MemberKind,
}

/// A real source file exposed under a flattened virtual path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespacedFile {
  /// Flattened path, e.g. `lib/foo/foo__a.ml`.
  pub virtual_path: PathBuf,

  /// Real file, e.g. `lib/foo/a.ml`.
  pub original_path: PathBuf,

  /// Module name of the real file, e.g. `A`.
  pub original_module: String,

  /// Module name of the virtual file, e.g. `Foo__a`.
  pub virtual_module: String,

  pub kind: SourceKind,

  /// Directory of the namespace the file belongs to.
  pub namespace: PathBuf,
}
