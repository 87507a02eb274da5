use crate::error::{LangError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Absolute identity of a file; falls back to the given path when it cannot be canonicalized.
pub fn canonical_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// File contents read during one extraction run, keyed by canonical path.
///
/// Text is decoded lossily so undecodable bytes never fail a read. Failed reads are
/// remembered as well, so a broken file is reported once per run.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: RefCell<HashMap<PathBuf, Result<Arc<str>>>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file through the cache
    pub fn read(&self, path: &Path) -> Result<Arc<str>> {
        let key = canonical_path(path);
        if let Some(entry) = self.entries.borrow().get(&key) {
            return entry.clone();
        }

        let entry = match std::fs::read(&key) {
            Ok(bytes) => Ok(Arc::<str>::from(String::from_utf8_lossy(&bytes).as_ref())),
            Err(err) => {
                log::warn!("Failed to read {}: {err}", key.display());
                Err(LangError::read(&key, &err))
            }
        };
        self.entries.borrow_mut().insert(key, entry.clone());
        entry
    }

    /// Number of distinct files read so far
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_once_and_serves_cached_text() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("mod.py");
        fs::write(&file, "x = 1\n").unwrap();

        let cache = SourceCache::new();
        assert_eq!(&*cache.read(&file).unwrap(), "x = 1\n");

        fs::write(&file, "x = 2\n").unwrap();
        assert_eq!(&*cache.read(&file).unwrap(), "x = 1\n");
        assert_eq!(cache.len(), 1);

        let fresh = SourceCache::new();
        assert_eq!(&*fresh.read(&file).unwrap(), "x = 2\n");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("latin.cpp");
        fs::write(&file, b"int caf\xe9 = 1;\n").unwrap();

        let cache = SourceCache::new();
        let text = cache.read(&file).unwrap();
        assert!(text.starts_with("int caf"));
        assert!(text.ends_with("= 1;\n"));
    }

    #[test]
    fn missing_file_yields_read_error() {
        let temp = tempdir().unwrap();
        let cache = SourceCache::new();
        let err = cache.read(&temp.path().join("absent.py")).unwrap_err();
        assert!(matches!(err, LangError::Read { .. }));
        assert!(cache.read(&temp.path().join("absent.py")).is_err());
        assert_eq!(cache.len(), 1);
    }
}
