//! File-backed [`LocalStore`]: one JSON file per key under a data directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{LocalStore, LocalStoreError};

/// Durable local storage backed by the filesystem.
///
/// Each key maps to `<dir>/<key>.json`. Writes go through a temp file and
/// rename so a crash mid-write never leaves a truncated entry behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(key, error = %err, "failed to read local store entry");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));

        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|err| LocalStoreError::WriteFailed {
                key: key.to_owned(),
                reason: err.to_string(),
            })
    }

    fn remove(&self, key: &str) {
        if let Err(err) = fs::remove_file(self.path_for(key))
            && err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(key, error = %err, "failed to remove local store entry");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> FileStore {
        let dir = std::env::temp_dir().join(format!("ambra-filestore-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        FileStore::new(dir).unwrap()
    }

    #[test]
    fn test_write_read_roundtrip() {
        let store = temp_store("roundtrip");
        store.write("cart", r#"{"items":[]}"#).unwrap();
        assert_eq!(store.read("cart").as_deref(), Some(r#"{"items":[]}"#));
    }

    #[test]
    fn test_read_missing_is_none() {
        let store = temp_store("missing");
        assert!(store.read("nope").is_none());
    }

    #[test]
    fn test_remove_then_read() {
        let store = temp_store("remove");
        store.write("wishlist", "[]").unwrap();
        store.remove("wishlist");
        assert!(store.read("wishlist").is_none());

        // Removing again is a no-op.
        store.remove("wishlist");
    }

    #[test]
    fn test_write_replaces_existing() {
        let store = temp_store("replace");
        store.write("language", "\"en\"").unwrap();
        store.write("language", "\"ar\"").unwrap();
        assert_eq!(store.read("language").as_deref(), Some("\"ar\""));
    }
}
