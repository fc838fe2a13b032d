use std::path::{Path, PathBuf};

/// Minimal metadata the selector needs about a path.
#[derive(Clone, Debug)]
pub struct FsMetadata {
    /// Whether the path refers to a directory (symlinks are followed).
    pub is_dir: bool,
    /// Whether the path itself is a symbolic link.
    pub is_symlink: bool,
}

/// Directory entry returned by [`FileSystem::read_dir`].
#[derive(Clone, Debug)]
pub struct FsEntry {
    /// Base name (no parent path)
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Whether this entry is a directory.
    pub is_dir: bool,
    /// Whether this entry itself is a symbolic link.
    pub is_symlink: bool,
    /// File size in bytes (`None` for directories or when unavailable).
    pub size: Option<u64>,
    /// Last modified timestamp (when available).
    pub modified: Option<std::time::SystemTime>,
}

impl FsEntry {
    /// Dotfiles are hidden unless the listing shows hidden entries.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Read-only filesystem access used by the selector.
///
/// The selector never reads or writes file contents; it only lists
/// directories and inspects paths. Tests substitute an in-memory
/// implementation.
pub trait FileSystem {
    /// List entries of a directory.
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>>;
    /// Fetch minimal metadata for a path. A missing path is an error.
    fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata>;
}

/// Default filesystem implementation using `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>> {
        let mut out = Vec::new();
        // Entries that vanish or cannot be stat'ed mid-listing are skipped.
        for e in std::fs::read_dir(dir)?.flatten() {
            let Ok(ft) = e.file_type() else {
                continue;
            };
            let path = e.path();
            let is_symlink = ft.is_symlink();
            // Follow links so a link to a directory can be entered.
            let meta = if is_symlink {
                std::fs::metadata(&path).ok()
            } else {
                e.metadata().ok()
            };
            let is_dir = meta.as_ref().map_or(ft.is_dir(), |m| m.is_dir());
            let size = meta.as_ref().filter(|m| m.is_file()).map(|m| m.len());
            out.push(FsEntry {
                name: e.file_name().to_string_lossy().into_owned(),
                path,
                is_dir,
                is_symlink,
                size,
                modified: meta.as_ref().and_then(|m| m.modified().ok()),
            });
        }
        Ok(out)
    }

    fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata> {
        let link_md = std::fs::symlink_metadata(path)?;
        let is_symlink = link_md.file_type().is_symlink();
        let is_dir = if is_symlink {
            std::fs::metadata(path)?.is_dir()
        } else {
            link_md.is_dir()
        };
        Ok(FsMetadata { is_dir, is_symlink })
    }
}
