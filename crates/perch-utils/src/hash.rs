use std::{path::Path, time::UNIX_EPOCH};

use crate::error::{FingerprintError, FingerprintResult};

/// Computes an opaque fingerprint for a file.
///
/// The fingerprint is a hex-encoded blake3 hash over the file's path and its
/// modification/creation timestamps. It deliberately does not read the file's
/// contents: it is a cheap probabilistic dedup key, not a content hash. A file
/// that is replaced in place (new timestamps) produces a new fingerprint even
/// though the path is unchanged.
///
/// # Arguments
///
/// * `file_path` - The path to the file to fingerprint.
///
/// # Errors
///
/// * [`FingerprintError::MetadataFailed`] if the file's metadata cannot be read.
pub fn file_fingerprint<P: AsRef<Path>>(file_path: P) -> FingerprintResult<String> {
    let file_path = file_path.as_ref();
    let metadata = file_path
        .metadata()
        .map_err(|err| FingerprintError::MetadataFailed {
            path: file_path.to_path_buf(),
            source: err,
        })?;

    let modified = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    // Not every filesystem records a creation time; fall back to mtime.
    let created = metadata
        .created()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(modified, |d| d.as_nanos());

    let mut hasher = blake3::Hasher::new();
    hasher.update(file_path.to_string_lossy().as_bytes());
    hasher.update(&modified.to_le_bytes());
    hasher.update(&created.to_le_bytes());
    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write, thread, time::Duration};

    use tempfile::tempdir;

    use super::file_fingerprint;

    #[test]
    fn test_fingerprint_is_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.msi");
        fs::write(&path, b"payload").unwrap();

        let first = file_fingerprint(&path).unwrap();
        let second = file_fingerprint(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fingerprint_differs_per_path() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.msi");
        let b = dir.path().join("b.msi");
        fs::write(&a, b"same").unwrap();
        fs::write(&b, b"same").unwrap();

        assert_ne!(
            file_fingerprint(&a).unwrap(),
            file_fingerprint(&b).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_changes_on_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.msi");
        fs::write(&path, b"one").unwrap();
        let before = file_fingerprint(&path).unwrap();

        // Coarse mtime granularity on some filesystems; give it room to tick.
        thread::sleep(Duration::from_millis(20));
        let mut file = fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.write_all(b"two").unwrap();
        file.sync_all().unwrap();
        drop(file);

        let after = file_fingerprint(&path).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_fingerprint_missing_file() {
        let result = file_fingerprint("/path/to/nonexistent/file");
        assert!(result.is_err());
    }
}
