//! Project configuration.
//!
//! Loaded from `nsbuild.toml` at the project root. Every field has a default,
//! so a project without a configuration file still works. A few settings can
//! be overridden from the environment:
//!
//! - `NSBUILD_BUILD_DIR` - build directory
//! - `NSBUILD_BUILD_LOG` - build log, relative to the build directory
//! - `NSBUILD_ANALYZER` - dependency analyzer program
//!
//! # Example
//!
//! ```toml
//! source_dirs = ["lib"]
//! libraries = ["lib/foo"]
//!
//! [analyzer]
//! program = "ocamldep"
//!
//! [analyzer.tag_flags]
//! "pp(camlp4o)" = ["-pp", "camlp4o"]
//!
//! [[executable]]
//! target = "bin/main"
//! libraries = ["foo"]
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_FILENAME, DEFAULT_ANALYZER, DEFAULT_BUILD_DIR, DEFAULT_BUILD_LOG, DEFAULT_COMPILERS, DEFAULT_SOURCE_DIR,
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid configuration in {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Source roots. Every directory strictly below a source root is a namespace.
  pub source_dirs: Vec<PathBuf>,

  /// Directory the host engine builds into, relative to the project root.
  pub build_dir: PathBuf,

  /// Compiler invocation log, relative to the build directory.
  pub build_log: PathBuf,

  /// Namespace directories that produce a library manifest.
  pub libraries: Vec<PathBuf>,

  pub analyzer: AnalyzerConfig,

  pub trace: TraceConfig,

  #[serde(rename = "executable")]
  pub executables: Vec<ExecutableConfig>,

  /// Static tags per source path, applied by the local engine.
  pub tags: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source_dirs: vec![PathBuf::from(DEFAULT_SOURCE_DIR)],
      build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
      build_log: PathBuf::from(DEFAULT_BUILD_LOG),
      libraries: Vec::new(),
      analyzer: AnalyzerConfig::default(),
      trace: TraceConfig::default(),
      executables: Vec::new(),
      tags: BTreeMap::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
  pub program: String,

  /// Flags passed on every invocation, after `-modules`.
  pub flags: Vec<String>,

  /// Extra flags contributed by a build tag.
  pub tag_flags: BTreeMap<String, Vec<String>>,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    Self {
      program: DEFAULT_ANALYZER.to_string(),
      flags: Vec::new(),
      tag_flags: BTreeMap::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
  /// Program names recognized as compiler invocations in the build log.
  pub compilers: Vec<String>,
}

impl Default for TraceConfig {
  fn default() -> Self {
    Self {
      compilers: DEFAULT_COMPILERS.iter().map(|c| c.to_string()).collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutableConfig {
  /// Executable path without its extension, e.g. `bin/main`.
  pub target: PathBuf,

  /// Libraries the executable links statically.
  #[serde(default)]
  pub libraries: Vec<String>,
}

impl Config {
  /// Load `nsbuild.toml` from `project_root`, falling back to defaults when
  /// the file does not exist, then apply environment overrides.
  pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
    let path = project_root.join(CONFIG_FILENAME);

    let mut config = match std::fs::read_to_string(&path) {
      Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
      })?,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no configuration file, using defaults");
        Config::default()
      }
      Err(source) => return Err(ConfigError::Read { path, source }),
    };

    config.apply_env();
    Ok(config)
  }

  fn apply_env(&mut self) {
    if let Ok(dir) = std::env::var("NSBUILD_BUILD_DIR") {
      self.build_dir = PathBuf::from(dir);
    }
    if let Ok(log) = std::env::var("NSBUILD_BUILD_LOG") {
      self.build_log = PathBuf::from(log);
    }
    if let Ok(program) = std::env::var("NSBUILD_ANALYZER") {
      self.analyzer.program = program;
    }
  }
}
