//! Namespace metadata derived from the source tree.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{Member, MemberKind, Namespace, NamespaceMetadata, NamespacedFile, SourceKind};
use crate::config::{Config, ExecutableConfig};
use crate::consts::NAMESPACE_SEPARATOR;
use crate::naming::{aliases_path, flat_name, is_valid_component, module_name, root_path};

#[derive(Debug, Error)]
pub enum MetadataError {
  #[error("failed to scan {path}: {source}")]
  WalkDir {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("module {module} is defined by both {first} and {second}")]
  DuplicateModule {
    module: String,
    first: PathBuf,
    second: PathBuf,
  },

  #[error("library {0} is not a namespace directory")]
  UnknownLibrary(PathBuf),
}

#[derive(Debug)]
struct NamespaceEntry {
  namespace: Namespace,
  /// Sub-namespace directories, in scan order.
  children: Vec<PathBuf>,
  /// Leaf modules by file stem.
  leaves: BTreeMap<String, Leaf>,
}

#[derive(Debug)]
struct Leaf {
  virtual_module: String,
  /// Virtual path without extension.
  virtual_root: PathBuf,
  /// Virtual source files, in scan order.
  files: Vec<PathBuf>,
}

impl Leaf {
  fn has_implementation(&self) -> bool {
    self
      .files
      .iter()
      .any(|file| SourceKind::of_path(file) == Some(SourceKind::Implementation))
  }
}

/// Namespace metadata for a project, scanned once from its source directories.
///
/// All paths are relative to the project root. The tree is immutable after
/// [`NamespaceTree::scan`] returns.
#[derive(Debug, Default)]
pub struct NamespaceTree {
  namespaces: BTreeMap<PathBuf, NamespaceEntry>,
  files: BTreeMap<PathBuf, NamespacedFile>,
  top_level: BTreeMap<String, PathBuf>,
  libraries: BTreeSet<PathBuf>,
  executables: Vec<ExecutableConfig>,
  /// Every module name in the flat space, with the path that defines it.
  modules: HashMap<String, (MemberKind, PathBuf)>,
}

impl NamespaceTree {
  /// Scan the source directories named in `config`.
  ///
  /// Directories and files whose names cannot be flattened are skipped with a
  /// warning. Two paths claiming the same flattened module is an error.
  pub fn scan(project_root: &Path, config: &Config) -> Result<Self, MetadataError> {
    let mut tree = NamespaceTree {
      executables: config.executables.clone(),
      ..Default::default()
    };

    for source_dir in &config.source_dirs {
      let base = project_root.join(source_dir);
      if !base.is_dir() {
        warn!(dir = %base.display(), "source directory does not exist");
        continue;
      }
      tree.scan_source_dir(source_dir, &base)?;
    }

    for library in &config.libraries {
      if !tree.namespaces.contains_key(library) {
        return Err(MetadataError::UnknownLibrary(library.clone()));
      }
      tree.libraries.insert(library.clone());
    }

    debug!(
      namespaces = tree.namespaces.len(),
      files = tree.files.len(),
      libraries = tree.libraries.len(),
      "scanned namespace tree"
    );

    Ok(tree)
  }

  fn scan_source_dir(&mut self, source_dir: &Path, base: &Path) -> Result<(), MetadataError> {
    let walker = WalkDir::new(base)
      .min_depth(1)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|e| {
        if !e.file_type().is_dir() {
          return true;
        }
        let valid = e.file_name().to_str().is_some_and(is_valid_component);
        if !valid {
          debug!(dir = %e.path().display(), "skipping directory that is not a namespace");
        }
        valid
      });

    for entry in walker {
      let entry = entry.map_err(|source| MetadataError::WalkDir {
        path: base.to_path_buf(),
        source,
      })?;

      let Ok(below) = entry.path().strip_prefix(base) else {
        continue;
      };
      let rel = source_dir.join(below);
      let components: Vec<String> = below
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

      if entry.file_type().is_dir() {
        self.add_namespace(rel, components)?;
      } else if let Some(kind) = SourceKind::of_path(&rel) {
        self.add_source(rel, kind)?;
      }
    }

    Ok(())
  }

  fn claim(&mut self, module: &str, kind: MemberKind, owner: &Path) -> Result<(), MetadataError> {
    match self.modules.get(module) {
      Some((existing_kind, existing)) if *existing_kind == kind && existing == owner => Ok(()),
      Some((_, existing)) => Err(MetadataError::DuplicateModule {
        module: module.to_string(),
        first: existing.clone(),
        second: owner.to_path_buf(),
      }),
      None => {
        self.modules.insert(module.to_string(), (kind, owner.to_path_buf()));
        Ok(())
      }
    }
  }

  fn add_namespace(&mut self, dir: PathBuf, components: Vec<String>) -> Result<(), MetadataError> {
    let flat = flat_name(&components);
    let module = module_name(&flat);
    self.claim(&module, MemberKind::Namespace, &dir)?;

    let parent = if components.len() > 1 {
      dir.parent().map(Path::to_path_buf)
    } else {
      None
    };

    match &parent {
      Some(parent_dir) => {
        if let Some(parent_entry) = self.namespaces.get_mut(parent_dir) {
          parent_entry.children.push(dir.clone());
        }
      }
      None => {
        self.top_level.insert(module.clone(), dir.clone());
      }
    }

    let namespace = Namespace {
      root_path: root_path(&dir, &flat),
      dir: dir.clone(),
      components,
      flat_name: flat,
      module_name: module,
      parent,
    };

    self.namespaces.insert(
      dir,
      NamespaceEntry {
        namespace,
        children: Vec::new(),
        leaves: BTreeMap::new(),
      },
    );
    Ok(())
  }

  fn add_source(&mut self, path: PathBuf, kind: SourceKind) -> Result<(), MetadataError> {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
      return Ok(());
    };
    if !is_valid_component(&stem) {
      warn!(file = %path.display(), "skipping source file whose name cannot be flattened");
      return Ok(());
    }

    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let owner = path.with_extension("");

    let Some(entry) = self.namespaces.get(&dir) else {
      // A file directly in a source root keeps its own name in the flat space.
      return self.claim(&module_name(&stem), MemberKind::Module, &owner);
    };

    let virtual_flat = format!("{}{}{}", entry.namespace.flat_name, NAMESPACE_SEPARATOR, stem);
    let virtual_module = module_name(&virtual_flat);
    let virtual_root = dir.join(&virtual_flat);
    let virtual_path = virtual_root.with_extension(kind.extension());
    self.claim(&virtual_module, MemberKind::Module, &owner)?;

    let file = NamespacedFile {
      virtual_path: virtual_path.clone(),
      original_path: path,
      original_module: module_name(&stem),
      virtual_module: virtual_module.clone(),
      kind,
      namespace: dir.clone(),
    };

    if let Some(entry) = self.namespaces.get_mut(&dir) {
      entry
        .leaves
        .entry(stem)
        .or_insert_with(|| Leaf {
          virtual_module,
          virtual_root,
          files: Vec::new(),
        })
        .files
        .push(virtual_path.clone());
    }
    self.files.insert(virtual_path, file);
    Ok(())
  }

  /// All namespaces, ordered by directory.
  pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
    self.namespaces.values().map(|entry| &entry.namespace)
  }

  /// All namespaced files, ordered by virtual path.
  pub fn files(&self) -> impl Iterator<Item = &NamespacedFile> {
    self.files.values()
  }

  pub fn is_library(&self, namespace: &Namespace) -> bool {
    self.libraries.contains(&namespace.dir)
  }

  fn find_member(&self, entry: &NamespaceEntry, name: &str) -> Option<String> {
    entry
      .leaves
      .iter()
      .find(|(stem, _)| module_name(stem) == name)
      .map(|(_, leaf)| leaf.virtual_module.clone())
      .or_else(|| {
        entry
          .children
          .iter()
          .filter_map(|child| self.namespaces.get(child))
          .find(|child| child.namespace.components.last().is_some_and(|c| module_name(c) == name))
          .map(|child| child.namespace.module_name.clone())
      })
  }

  fn collect_library(&self, entry: &NamespaceEntry, out: &mut Vec<String>) {
    let root = &entry.namespace.root_path;
    out.push(aliases_path(root).to_string_lossy().into_owned());

    // Interface-only modules produce no object file.
    for leaf in entry.leaves.values().filter(|leaf| leaf.has_implementation()) {
      out.push(leaf.virtual_root.to_string_lossy().into_owned());
    }
    for child in &entry.children {
      if let Some(child_entry) = self.namespaces.get(child) {
        self.collect_library(child_entry, out);
      }
    }

    out.push(root.to_string_lossy().into_owned());
  }
}

impl NamespaceMetadata for NamespaceTree {
  fn namespace_of(&self, dir: &Path) -> Option<&Namespace> {
    self.namespaces.get(dir).map(|entry| &entry.namespace)
  }

  fn dependency_closure(&self, namespace: &Namespace) -> Vec<PathBuf> {
    let Some(entry) = self.namespaces.get(&namespace.dir) else {
      return Vec::new();
    };

    let mut closure = Vec::new();
    for member in self.members(namespace) {
      match member.kind {
        MemberKind::Module => {
          if let Some(leaf) = entry.leaves.values().find(|leaf| leaf.virtual_module == member.target) {
            closure.extend(leaf.files.iter().cloned());
          }
        }
        MemberKind::Namespace => {
          if let Some(child) = self.namespaces.values().find(|e| e.namespace.module_name == member.target) {
            closure.push(child.namespace.root_file());
          }
        }
      }
    }
    closure
  }

  fn members(&self, namespace: &Namespace) -> Vec<Member> {
    let Some(entry) = self.namespaces.get(&namespace.dir) else {
      return Vec::new();
    };

    let mut members: Vec<Member> = entry
      .leaves
      .iter()
      .map(|(stem, leaf)| Member {
        name: module_name(stem),
        target: leaf.virtual_module.clone(),
        kind: MemberKind::Module,
      })
      .chain(
        entry
          .children
          .iter()
          .filter_map(|child| self.namespaces.get(child))
          .filter_map(|child| {
            let last = child.namespace.components.last()?;
            Some(Member {
              name: module_name(last),
              target: child.namespace.module_name.clone(),
              kind: MemberKind::Namespace,
            })
          }),
      )
      .collect();

    members.sort_by(|a, b| a.name.cmp(&b.name));
    members
  }

  fn library_members(&self, namespace: &Namespace) -> Option<Vec<String>> {
    if !self.is_library(namespace) {
      return None;
    }
    let entry = self.namespaces.get(&namespace.dir)?;
    let mut members = Vec::new();
    self.collect_library(entry, &mut members);
    Some(members)
  }

  fn file_by_virtual_path(&self, path: &Path) -> Option<&NamespacedFile> {
    self.files.get(path)
  }

  fn resolve(&self, file: &NamespacedFile, raw: &str) -> Option<String> {
    let mut current = Some(file.namespace.as_path());
    while let Some(dir) = current {
      let entry = self.namespaces.get(dir)?;
      if let Some(target) = self.find_member(entry, raw) {
        return Some(target);
      }
      current = entry.namespace.parent.as_deref();
    }

    self.top_level.contains_key(raw).then(|| raw.to_string())
  }

  fn executable_libraries(&self, target: &Path) -> Vec<String> {
    let target = target.with_extension("");
    self
      .executables
      .iter()
      .find(|exe| exe.target == target)
      .map(|exe| exe.libraries.clone())
      .unwrap_or_default()
  }
}
