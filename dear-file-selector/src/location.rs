//! Conversions between filesystem paths and the location strings reported in
//! a selection, plus directory and file name validation.

use std::path::{Path, PathBuf};

use url::Url;

use crate::core::SelectorError;
use crate::fs::FileSystem;

/// Directory used when no usable starting directory was configured.
///
/// The user's home directory, else the process working directory, else the
/// filesystem root.
pub fn fallback_directory() -> PathBuf {
    dirs::home_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR.to_string()))
}

/// Returns `true` if `path` exists and is a directory.
pub fn is_valid_folder(fs: &dyn FileSystem, path: &Path) -> bool {
    fs.metadata(path).is_ok_and(|m| m.is_dir)
}

/// Picks the directory a session starts in.
///
/// Returns the directory and whether the fallback had to be used. The
/// requested directory is kept as configured, symlinks included; a relative
/// path is only made absolute against the working directory.
pub(crate) fn resolve_directory(fs: &dyn FileSystem, requested: Option<&Path>) -> (PathBuf, bool) {
    if let Some(dir) = requested
        && !dir.as_os_str().is_empty()
        && is_valid_folder(fs, dir)
    {
        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        return (dir, false);
    }
    (fallback_directory(), true)
}

/// Location string reported for a selected path.
pub fn path_to_location(path: &Path) -> String {
    path.display().to_string()
}

/// `file://` URI for an absolute path.
pub fn path_to_uri(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(String::from)
}

/// Checks a typed file name and returns it unchanged.
///
/// The name must be a single path component: no separators, not `.` or `..`.
/// Surrounding whitespace is part of the name; a name made only of
/// whitespace counts as empty.
pub fn validate_filename(name: &str) -> Result<&str, SelectorError> {
    if name.trim().is_empty() {
        return Err(SelectorError::EmptyFilename);
    }
    let invalid = name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(SelectorError::InvalidFilename(name.to_string()));
    }
    Ok(name)
}
