//! Hashing utilities for namespace digests.
//!
//! This module provides:
//! - `ContentHash`: A full 64-character hash for content verification
//! - `digest_files()`: Deterministic digest over an ordered file list
//! - `hash_file()`: Single file hashing

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// A full 64-character SHA256 hash.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error while hashing files.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
  #[error("failed to read file {path}: {source}")]
  ReadFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Compute the digest of an ordered list of files.
///
/// Each entry contributes its path (as given, relative to `root`) and the hash
/// of its content, so the digest changes whenever a file's content changes or
/// the list itself changes. Symbolic links are followed.
///
/// The order of `files` is significant and is not normalized here; callers
/// pass the order supplied by namespace metadata.
pub fn digest_files(root: &Path, files: &[PathBuf]) -> Result<ContentHash, HashError> {
  let mut hasher = Sha256::new();

  for file in files {
    let content_hash = hash_file(&root.join(file))?;
    hasher.update(format!("F:{}:{}", file.display(), content_hash.0).as_bytes());
    hasher.update(b"\n");
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash a file's contents.
///
/// Returns the full 64-character SHA256 hash of the file.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let mut file = fs::File::open(path).map_err(|source| HashError::ReadFile {
    path: path.to_path_buf(),
    source,
  })?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(|source| HashError::ReadFile {
      path: path.to_path_buf(),
      source,
    })?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}
