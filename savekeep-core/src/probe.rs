use std::fs;
use std::path::Path;

use crate::{Result, SavekeepError};

const MARKER_FILE: &str = ".savekeep_write_test";

/// Check that `dir` can hold backups.
///
/// Creates the directory if absent, then writes and removes a marker file.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    let not_writable = |source| SavekeepError::NotWritable {
        path: dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(not_writable)?;

    let marker = dir.join(MARKER_FILE);
    fs::write(&marker, b"test").map_err(not_writable)?;
    fs::remove_file(&marker).map_err(not_writable)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");

        ensure_writable(&dir).unwrap();

        assert!(dir.is_dir());
        assert!(!dir.join(MARKER_FILE).exists());
    }

    #[test]
    fn test_file_in_the_way_is_not_writable() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = ensure_writable(&blocker.join("backups")).unwrap_err();
        assert!(matches!(err, SavekeepError::NotWritable { .. }));
    }
}
