use std::{error::Error, fmt, path::PathBuf};

#[derive(Debug)]
pub enum FileSystemError {
    File {
        path: PathBuf,
        action: &'static str,
        source: std::io::Error,
    },

    Directory {
        path: PathBuf,
        action: &'static str,
        source: std::io::Error,
    },

    NotADirectory {
        path: PathBuf,
    },
}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::File {
                path,
                action,
                source,
            } => {
                write!(f, "Failed to {action} file `{}`: {source}", path.display())
            }
            FileSystemError::Directory {
                path,
                action,
                source,
            } => {
                write!(
                    f,
                    "Failed to {action} directory `{}`: {source}",
                    path.display()
                )
            }
            FileSystemError::NotADirectory { path } => {
                write!(f, "`{}` is not a directory", path.display())
            }
        }
    }
}

impl Error for FileSystemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FileSystemError::File { source, .. } => Some(source),
            FileSystemError::Directory { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum FingerprintError {
    MetadataFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for FingerprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintError::MetadataFailed { path, source } => {
                write!(
                    f,
                    "Failed to read metadata for `{}`: {source}",
                    path.display()
                )
            }
        }
    }
}

impl Error for FingerprintError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FingerprintError::MetadataFailed { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub enum UtilsError {
    FileSystem(FileSystemError),
    Fingerprint(FingerprintError),
}

impl fmt::Display for UtilsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilsError::FileSystem(err) => write!(f, "{err}"),
            UtilsError::Fingerprint(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UtilsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UtilsError::FileSystem(err) => Some(err),
            UtilsError::Fingerprint(err) => Some(err),
        }
    }
}

impl From<FileSystemError> for UtilsError {
    fn from(err: FileSystemError) -> Self {
        UtilsError::FileSystem(err)
    }
}

impl From<FingerprintError> for UtilsError {
    fn from(err: FingerprintError) -> Self {
        UtilsError::Fingerprint(err)
    }
}

pub type FileSystemResult<T> = std::result::Result<T, FileSystemError>;
pub type FingerprintResult<T> = std::result::Result<T, FingerprintError>;

pub type UtilsResult<T> = std::result::Result<T, UtilsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_file_system_error_display_and_source() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let file_error = FileSystemError::File {
            path: PathBuf::from("/file"),
            action: "read",
            source: io_error,
        };
        assert_eq!(
            file_error.to_string(),
            "Failed to read file `/file`: permission denied"
        );
        assert!(file_error.source().is_some());

        let io_error2 = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let dir_error = FileSystemError::Directory {
            path: PathBuf::from("/dir"),
            action: "list",
            source: io_error2,
        };
        assert_eq!(
            dir_error.to_string(),
            "Failed to list directory `/dir`: permission denied"
        );
        assert!(dir_error.source().is_some());

        let not_a_dir_error = FileSystemError::NotADirectory {
            path: PathBuf::from("/path"),
        };
        assert_eq!(not_a_dir_error.to_string(), "`/path` is not a directory");
        assert!(not_a_dir_error.source().is_none());
    }

    #[test]
    fn test_fingerprint_error_display_and_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = FingerprintError::MetadataFailed {
            path: PathBuf::from("/test"),
            source: io_error,
        };
        assert_eq!(
            error.to_string(),
            "Failed to read metadata for `/test`: file not found"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn test_utils_error_display_and_source_and_from() {
        let fs_error = FileSystemError::NotADirectory {
            path: PathBuf::from("/path"),
        };
        let utils_error_from_fs = UtilsError::from(fs_error);
        assert_eq!(
            utils_error_from_fs.to_string(),
            "`/path` is not a directory"
        );
        assert!(utils_error_from_fs.source().is_some());

        let io_error = io::Error::new(io::ErrorKind::NotFound, "gone");
        let fp_error = FingerprintError::MetadataFailed {
            path: PathBuf::from("/gone"),
            source: io_error,
        };
        let utils_error_from_fp = UtilsError::from(fp_error);
        assert_eq!(
            utils_error_from_fp.to_string(),
            "Failed to read metadata for `/gone`: gone"
        );
        assert!(utils_error_from_fp.source().is_some());
    }
}
