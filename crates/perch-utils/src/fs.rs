use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{FileSystemError, FileSystemResult};

pub trait FileSystemProvider {
    /// Creates a directory structure if it doesn't exist.
    ///
    /// If the directory already exists, this function does nothing. If the path
    /// exists but is not a directory, this function returns an error.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to create.
    ///
    /// # Errors
    ///
    /// * [`FileSystemError::Directory`] if the directory could not be created.
    /// * [`FileSystemError::NotADirectory`] if the path exists but is not a directory.
    fn ensure_dir_exists<P: AsRef<Path>>(&self, path: P) -> FileSystemResult<()>;

    /// Lists the regular files directly inside a directory, non-recursively.
    ///
    /// Subdirectories and their contents are skipped. The returned paths are
    /// sorted so callers observe a deterministic order regardless of the
    /// underlying directory iteration.
    ///
    /// # Arguments
    ///
    /// * `path` - The directory to list.
    ///
    /// # Errors
    ///
    /// * [`FileSystemError::NotADirectory`] if the path is not a directory.
    /// * [`FileSystemError::Directory`] if the directory cannot be read.
    fn list_files<P: AsRef<Path>>(&self, path: P) -> FileSystemResult<Vec<PathBuf>>;
}

#[derive(Default, Clone)]
pub struct StandardFileSystemProvider;

impl FileSystemProvider for StandardFileSystemProvider {
    fn ensure_dir_exists<P: AsRef<Path>>(&self, path: P) -> FileSystemResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).map_err(|err| FileSystemError::Directory {
                path: path.to_path_buf(),
                action: "create",
                source: err,
            })?;
        } else if !path.is_dir() {
            return Err(FileSystemError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        Ok(())
    }

    fn list_files<P: AsRef<Path>>(&self, path: P) -> FileSystemResult<Vec<PathBuf>> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(FileSystemError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let entries = fs::read_dir(path).map_err(|err| FileSystemError::Directory {
            path: path.to_path_buf(),
            action: "read",
            source: err,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| FileSystemError::Directory {
                path: path.to_path_buf(),
                action: "read",
                source: err,
            })?;
            let entry_path = entry.path();
            if entry_path.is_file() {
                files.push(entry_path);
            }
        }
        files.sort();

        Ok(files)
    }
}

/// Creates a directory structure if it doesn't exist.
///
/// This is a convenience function that creates a [`StandardFileSystemProvider`] and calls
/// [`FileSystemProvider::ensure_dir_exists`] on it.
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    StandardFileSystemProvider.ensure_dir_exists(path)
}

/// Lists the regular files directly inside a directory, non-recursively.
///
/// This is a convenience function that creates a [`StandardFileSystemProvider`] and calls
/// [`FileSystemProvider::list_files`] on it.
pub fn list_files<P: AsRef<Path>>(path: P) -> FileSystemResult<Vec<PathBuf>> {
    StandardFileSystemProvider.list_files(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());

        // Idempotent on an existing directory.
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.txt");
        fs::write(&file_path, "hello").unwrap();

        let result = ensure_dir_exists(&file_path);
        assert!(matches!(
            result,
            Err(FileSystemError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_list_files_skips_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "c").unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_list_files_missing_directory() {
        let dir = tempdir().unwrap();
        let result = list_files(dir.path().join("missing"));
        assert!(matches!(
            result,
            Err(FileSystemError::NotADirectory { .. })
        ));
    }
}
