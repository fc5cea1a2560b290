//! Disk cache of computed values, keyed by task content hash.
//!
//! Layout:
//! ```text
//! <cache_dir>/
//! └── <2-char-prefix>/
//!     └── <full-hex-hash>.json
//! ```
//!
//! Entries are append-only: once written, never modified. A key uniquely
//! identifies a call and everything beneath it, so the same key always maps
//! to the same result. Writes go through a temporary file and a rename, so
//! readers never see a partial entry.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ComputeError;
use crate::hash::ContentHash;
use crate::value::Value;

const ENTRY_EXTENSION: &str = "json";

/// Handle on a cache directory. The directory is created on first store.
#[derive(Clone, Debug)]
pub struct DiskCache {
    root: PathBuf,
}

/// Statistics about a cache directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached values.
    pub entries: usize,
    /// Total size in bytes.
    pub total_bytes: u64,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskCache { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &ContentHash) -> PathBuf {
        let hex = key.to_hex();
        self.root
            .join(&hex[..2])
            .join(format!("{}.{}", hex, ENTRY_EXTENSION))
    }

    /// Look up a cached value.
    ///
    /// A missing entry is `None`. An unreadable or undecodable entry is
    /// logged and also treated as a miss, so it gets recomputed.
    pub fn lookup(&self, key: &ContentHash) -> Option<Value> {
        let path = self.entry_path(key);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("cannot read cache entry '{}': {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring corrupt cache entry '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Store a value. An existing entry for `key` is left untouched.
    pub fn store(&self, key: &ContentHash, value: &Value) -> Result<PathBuf, ComputeError> {
        let path = self.entry_path(key);
        if path.exists() {
            return Ok(path);
        }
        let dir = match path.parent() {
            Some(dir) => dir,
            None => return Ok(path),
        };
        std::fs::create_dir_all(dir)?;

        let text = serde_json::to_string(value)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        if let Err(e) = tmp.persist(&path) {
            // Lost a race with another store of the same key.
            if !path.exists() {
                return Err(e.error.into());
            }
        }
        Ok(path)
    }

    /// Count entries and bytes. A missing directory is an empty cache.
    pub fn stats(&self) -> std::io::Result<CacheStats> {
        let mut stats = CacheStats::default();
        if !self.root.is_dir() {
            return Ok(stats);
        }
        for prefix in std::fs::read_dir(&self.root)? {
            let prefix = prefix?;
            if !prefix.file_type()?.is_dir() {
                continue;
            }
            for entry in std::fs::read_dir(prefix.path())? {
                let path = entry?.path();
                if path.extension().is_some_and(|e| e == ENTRY_EXTENSION) {
                    stats.entries += 1;
                    stats.total_bytes += std::fs::metadata(&path)?.len();
                }
            }
        }
        Ok(stats)
    }

    /// Remove the whole cache directory.
    pub fn clear(&self) -> std::io::Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hash() -> ContentHash {
        ContentHash([0xAB; 32])
    }

    #[test]
    fn test_store_and_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(tmp.path());
        let value = Value::Tuple(vec![Value::Int(1), Value::Str("two".into())]);

        let path = cache.store(&test_hash(), &value).unwrap();
        assert!(path.starts_with(tmp.path().join("ab")));
        assert_eq!(cache.lookup(&test_hash()), Some(value));

        // Lookup non-existent key
        assert_eq!(cache.lookup(&ContentHash([0x01; 32])), None);
    }

    #[test]
    fn test_append_only_semantics() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(tmp.path());

        cache.store(&test_hash(), &Value::Int(1)).unwrap();
        cache.store(&test_hash(), &Value::Int(2)).unwrap();

        assert_eq!(
            cache.lookup(&test_hash()),
            Some(Value::Int(1)),
            "append-only: first write wins"
        );
    }

    #[test]
    fn test_concurrent_stores_of_one_key() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(tmp.path());
        let value = Value::Str("shared".into());

        let results: Vec<_> = std::thread::scope(|s| {
            let (cache, value) = (&cache, &value);
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(move || cache.store(&test_hash(), value)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for result in results {
            assert!(result.is_ok(), "{:?}", result);
        }
        assert_eq!(cache.lookup(&test_hash()), Some(value.clone()));
        assert_eq!(cache.stats().unwrap().entries, 1);
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(tmp.path());
        let path = cache.store(&test_hash(), &Value::Int(1)).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(cache.lookup(&test_hash()), None);
    }

    #[test]
    fn test_stats_and_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("cache");
        let cache = DiskCache::new(&root);
        assert_eq!(cache.stats().unwrap(), CacheStats::default());

        cache.store(&ContentHash([0x01; 32]), &Value::Int(1)).unwrap();
        cache.store(&ContentHash([0x02; 32]), &Value::Int(2)).unwrap();
        let stats = cache.stats().unwrap();
        assert_eq!(stats.entries, 2);
        assert!(stats.total_bytes > 0);

        cache.clear().unwrap();
        assert!(!root.exists());
        assert_eq!(cache.stats().unwrap().entries, 0);
    }
}
