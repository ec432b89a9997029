//! Removable-storage capability and a host-directory backend.
//!
//! Storage paths are `/`-separated strings rooted at `/`; directory paths
//! other than the root carry a trailing `/` (`/photos/2024/`).

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::StorageError;

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

pub trait Storage: Send + Sync {
    /// Children of `path`, in backend order.
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, StorageError>;

    fn open_read(&self, path: &str) -> Result<Box<dyn Read + Send>, StorageError>;

    /// Create or truncate `path` for writing.
    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>, StorageError>;

    fn remove(&self, path: &str) -> Result<(), StorageError>;

    fn exists(&self, path: &str) -> bool;
}

/// Storage backed by a directory on the host filesystem, mounted as `/`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut out = self.root.clone();
        for part in path.split('/').filter(|p| !p.is_empty() && *p != "." && *p != "..") {
            out.push(part);
        }
        out
    }
}

impl Storage for LocalStorage {
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, StorageError> {
        let dir = self.resolve(path);
        let meta = fs::metadata(&dir).map_err(|e| StorageError::io(path, e))?;
        if !meta.is_dir() {
            return Err(StorageError::NotADirectory(path.to_string()));
        }

        let mut out = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            let Some(name) = entry.file_name().to_str() else {
                tracing::debug!(path = %entry.path().display(), "skipping non-utf8 name");
                continue;
            };
            out.push(DirEntry {
                name: name.to_string(),
                is_dir: entry.file_type().is_dir(),
            });
        }
        Ok(out)
    }

    fn open_read(&self, path: &str) -> Result<Box<dyn Read + Send>, StorageError> {
        let file = fs::File::open(self.resolve(path)).map_err(|e| StorageError::io(path, e))?;
        Ok(Box::new(std::io::BufReader::new(file)))
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>, StorageError> {
        let file = fs::File::create(self.resolve(path)).map_err(|e| StorageError::io(path, e))?;
        Ok(Box::new(std::io::BufWriter::new(file)))
    }

    fn remove(&self, path: &str) -> Result<(), StorageError> {
        fs::remove_file(self.resolve(path)).map_err(|e| StorageError::io(path, e))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

/// `dir` joined with a child `name`; `dir` is a directory path as above.
#[must_use]
pub fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Directory path of `dir` plus one subdirectory level.
#[must_use]
pub fn child_dir(dir: &str, name: &str) -> String {
    let mut out = join(dir, name.trim_end_matches('/'));
    out.push('/');
    out
}

/// Drop the last segment of a directory path; the root stays the root.
#[must_use]
pub fn parent_dir(dir: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => trimmed[..=idx].to_string(),
    }
}
