//! Flattening of namespaced paths into unique module names.
//!
//! A namespace `lib/foo/bar` below the source root `lib` has the flat name
//! `foo__bar` and the module name `Foo__bar`. Every generated artifact of that
//! namespace is keyed by its root path, the flat name placed in the parent
//! directory (`lib/foo/foo__bar`):
//!
//! | artifact         | path                          |
//! |------------------|-------------------------------|
//! | digest stamp     | `lib/foo/foo__bar.stamp`      |
//! | alias aggregate  | `lib/foo/foo__bar___aliases.ml` |
//! | namespace root   | `lib/foo/foo__bar.ml`         |
//! | library manifest | `lib/foo/foo__bar.mllib`      |
//!
//! A leaf file `lib/foo/a.ml` becomes `lib/foo/foo__a.ml` (module `Foo__a`).

use std::path::{Path, PathBuf};

use crate::consts::{ALIASES_SUFFIX, NAMESPACE_SEPARATOR};

/// Whether `name` may take part in a flattened module name.
///
/// Components must start with an ASCII letter, contain only letters, digits,
/// `_` and `'`, must not contain the separator and must not end with `_`. The
/// last two rules keep `a` + `__` + `b` from ever being read back differently.
pub fn is_valid_component(name: &str) -> bool {
  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return false;
  };

  first.is_ascii_alphabetic()
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\'')
    && !name.contains(NAMESPACE_SEPARATOR)
    && !name.ends_with('_')
}

/// Join components into a flat name: `["foo", "bar"]` -> `foo__bar`.
pub fn flat_name<S: AsRef<str>>(components: &[S]) -> String {
  components
    .iter()
    .map(|c| c.as_ref())
    .collect::<Vec<_>>()
    .join(NAMESPACE_SEPARATOR)
}

/// Module name of a file stem: the stem with its first letter capitalized.
pub fn module_name(stem: &str) -> String {
  let mut chars = stem.chars();
  match chars.next() {
    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
    None => String::new(),
  }
}

/// Module name of a path, ignoring directories and any extension.
///
/// `lib/foo/foo__a.ml` and `lib/foo/foo__a` both give `Foo__a`.
pub fn module_name_of_path(path: &Path) -> String {
  let stem = path
    .file_name()
    .map(|name| name.to_string_lossy())
    .unwrap_or_default();
  let stem = stem.split('.').next().unwrap_or_default();
  module_name(stem)
}

/// Root path of a namespace: the flat name placed in the parent directory.
pub fn root_path(dir: &Path, flat: &str) -> PathBuf {
  match dir.parent() {
    Some(parent) => parent.join(flat),
    None => PathBuf::from(flat),
  }
}

/// Inverse of [`root_path`]: the directory a namespace root path stands for.
///
/// `lib/foo/foo__bar` -> `lib/foo/bar`. The result is only a candidate; it
/// names a namespace only if metadata knows it.
pub fn namespace_dir_of(root: &Path) -> Option<PathBuf> {
  let flat = root.file_name()?.to_str()?;
  let components: Vec<&str> = flat.split(NAMESPACE_SEPARATOR).collect();
  if !components.iter().all(|c| is_valid_component(c)) {
    return None;
  }
  let last = components.last()?;
  Some(match root.parent() {
    Some(parent) => parent.join(last),
    None => PathBuf::from(*last),
  })
}

/// Alias aggregate module path (without extension) of a namespace root path.
pub fn aliases_path(root: &Path) -> PathBuf {
  with_suffix(root, ALIASES_SUFFIX)
}

/// Strip `suffix` from the end of `path`, if present.
pub fn strip_suffix(path: &Path, suffix: &str) -> Option<PathBuf> {
  path.to_str()?.strip_suffix(suffix).map(PathBuf::from)
}

/// Append `suffix` to `path` verbatim (`a.ml` + `.depends` -> `a.ml.depends`).
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(suffix);
  PathBuf::from(name)
}
