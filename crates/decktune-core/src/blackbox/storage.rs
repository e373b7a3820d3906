//! Filesystem access for the recording store
//!
//! [`StorageBackend`] is the seam between the store and the disk, so failure
//! modes like a full disk can be reproduced without one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Filesystem operations used by [`super::RecordingStore`]
pub trait StorageBackend {
    /// Create a directory and its parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Replace `path` with `contents` so readers never observe a partial file
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Read a whole file as UTF-8
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Paths of the regular files directly inside `dir`
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;
}

/// The local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDisk;

impl LocalDisk {
    /// Write to a sibling temp file, fsync, then rename over the target
    fn write_via_temp(tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = File::create(tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(tmp, path)
    }
}

impl StorageBackend for LocalDisk {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let result = Self::write_via_temp(&tmp, path, contents);
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
