//! Forwarding links for virtual source files.

use std::fs;
use std::io;
use std::path::Path;

/// Point `link` at `target`, replacing whatever `link` currently is.
///
/// `target` is written verbatim into the link, so a bare file name produces a
/// link relative to the directory containing `link`.
pub fn replace_link(target: &Path, link: &Path) -> io::Result<()> {
  if let Some(parent) = link.parent() {
    fs::create_dir_all(parent)?;
  }

  match fs::symlink_metadata(link) {
    Ok(_) => fs::remove_file(link)?,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(e),
  }

  create_link(target, link)
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
  std::os::windows::fs::symlink_file(target, link)
}
