use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors reading a JSON side file
#[derive(Error, Debug)]
pub enum SideFileError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] io::Error),
    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Resolve `path` against the current directory without touching symlinks.
///
/// Unlike `fs::canonicalize` this works for paths that do not exist yet,
/// which is what we need for report destinations.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Resolve a report destination the way the walker resolves the root.
///
/// The parent directory is canonicalized when it exists, so the result
/// matches paths reported by file-system events under a canonical root even
/// when the destination is reached through a symlink.
pub fn resolve_report_path(dest: &Path) -> io::Result<PathBuf> {
    let absolute = absolute_path(dest)?;
    let (parent, name) = match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => (parent, name),
        _ => return Ok(absolute),
    };
    match fs::canonicalize(parent) {
        Ok(parent) => Ok(parent.join(name)),
        Err(_) => Ok(absolute),
    }
}

/// Read a file as text, replacing invalid UTF-8 sequences.
///
/// Scene and prefab files are occasionally saved with stray bytes; identity
/// matching only needs the ASCII parts, so a lossy decode is fine.
pub fn read_text_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Read and parse a JSON file
pub fn read_json(path: &Path) -> Result<Value, SideFileError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write a UTF-8 report so that `dest` is either the complete report or untouched.
///
/// The content is written next to the destination first and renamed over it.
pub fn write_report(dest: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let partial = partial_path(dest);
    if let Err(e) = fs::write(&partial, content) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }
    if let Err(e) = fs::rename(&partial, dest) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    debug!("Report written to {}", dest.display());
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("report"));
    name.push(".partial");
    dest.with_file_name(name)
}
