use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::utils::hash::{hash_bytes, hash_file};

/// What [`write_atomic`] did with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    /// Destination already held identical bytes and was left untouched.
    Unchanged,
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

/// Write `data` to `path` through a temporary file in the same directory,
/// renamed over the destination only once fully written.
///
/// Missing parent directories are created. If the destination already has
/// the same content, nothing is written.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<WriteStatus> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    ensure_dir(parent)?;

    if path.is_file() && hash_file(path)? == hash_bytes(data) {
        return Ok(WriteStatus::Unchanged);
    }

    let dir = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(WriteStatus::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_creates_nested_directories() {
        let root = tempdir().unwrap();
        let path = root.path().join("res").join("drawable-mdpi").join("icon.png");

        let status = write_atomic(&path, b"png").unwrap();

        assert_eq!(status, WriteStatus::Written);
        assert_eq!(fs::read(&path).unwrap(), b"png");
    }

    #[test]
    fn identical_content_is_unchanged() {
        let root = tempdir().unwrap();
        let path = root.path().join("icon.png");

        write_atomic(&path, b"same").unwrap();
        let status = write_atomic(&path, b"same").unwrap();

        assert_eq!(status, WriteStatus::Unchanged);
    }

    #[test]
    fn different_content_replaces_file() {
        let root = tempdir().unwrap();
        let path = root.path().join("icon.png");
        fs::write(&path, b"old").unwrap();

        let status = write_atomic(&path, b"new").unwrap();

        assert_eq!(status, WriteStatus::Written);
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let root = tempdir().unwrap();
        write_atomic(&root.path().join("a.png"), b"a").unwrap();
        write_atomic(&root.path().join("b.png"), b"b").unwrap();

        let count = fs::read_dir(root.path()).unwrap().count();
        assert_eq!(count, 2);
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let root = tempdir().unwrap();
        let dir = root.path().join("images");

        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }

    #[test]
    fn write_fails_when_parent_is_a_file() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("images");
        fs::write(&blocker, b"not a directory").unwrap();

        let result = write_atomic(&blocker.join("icon.png"), b"png");

        assert!(result.is_err());
    }
}
