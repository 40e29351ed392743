//! Directory listing for the file pane.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from listing a directory.
#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BrowseError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => BrowseError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => BrowseError::PermissionDenied(path.to_path_buf()),
            _ => BrowseError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

pub type BrowseResult<T> = Result<T, BrowseError>;

/// One name in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    /// Name as shown in the file pane; directories end with `/`.
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Source of directory contents.
pub trait DirectoryLister {
    /// Entries of `path`, sorted by name.
    fn list_entries(&self, path: &Path) -> BrowseResult<Vec<Entry>>;
}

/// Lists the real filesystem. Hidden entries are included.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list_entries(&self, path: &Path) -> BrowseResult<Vec<Entry>> {
        let read_dir = fs::read_dir(path).map_err(|e| BrowseError::from_io(path, e))?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| BrowseError::from_io(path, e))?;
            // Follows symlinks; broken links list as files
            let is_dir = item.path().is_dir();
            entries.push(Entry {
                name: item.file_name().to_string_lossy().to_string(),
                is_dir,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!("Listed {} entries in {}", entries.len(), path.display());
        Ok(entries)
    }
}
