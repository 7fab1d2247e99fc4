//! Disk I/O helpers: load from file, plain overwrite, and atomic replace.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Reads the file at `path`. A missing or empty file yields `None` (not an
/// error); the collection starts out empty in that case.
pub fn load(path: &Path) -> Result<Option<Vec<u8>>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(bytes))
}

/// Truncate-and-write. Fast, but a crash mid-write can leave the file
/// truncated or containing a mixture of old and new bytes.
pub fn overwrite(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| Error::Io(e.to_string()))
}

/// Write `bytes` to a unique temp file next to `path`, flush it to stable
/// storage, then rename it over `path`. The file is observed as either the
/// complete old content or the complete new content, never partial.
pub fn atomic_replace(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = std::fs::File::create(&tmp).map_err(|e| Error::Io(e.to_string()))?;
        file.write_all(bytes).map_err(|e| Error::Io(e.to_string()))?;
        file.sync_all().map_err(|e| Error::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))
    })();
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

/// Unique temp-file name in the same directory as `path`, so the final
/// rename never crosses a filesystem boundary.
fn temp_sibling(path: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let fname = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_name = format!(".{fname}.{}.{n}.tmp", std::process::id());
    match path.parent() {
        Some(dir) => dir.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_is_none() {
        let path = std::env::temp_dir().join("synced_json_persist_missing.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(load(&path).unwrap(), None);
    }

    #[test]
    fn atomic_replace_leaves_no_temp_residue() {
        let dir = std::env::temp_dir();
        let path = dir.join("synced_json_persist_atomic.json");
        atomic_replace(&path, b"{}").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");

        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.starts_with(".synced_json_persist_atomic.json.") && name.ends_with(".tmp")
            })
            .collect();
        assert!(leftovers.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn atomic_replace_into_missing_dir_fails() {
        let path = std::env::temp_dir()
            .join("synced_json_no_such_dir")
            .join("doc.json");
        assert!(matches!(atomic_replace(&path, b"{}"), Err(Error::Io(_))));
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn failed_rename_cleans_up_the_temp_file() {
        let dir = std::env::temp_dir().join("synced_json_persist_cleanup");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        // renaming a file over an existing directory fails, after the temp
        // file has already been written
        let target = dir.join("doc.json");
        std::fs::create_dir(&target).unwrap();

        assert!(matches!(atomic_replace(&target, b"{}"), Err(Error::Io(_))));
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
