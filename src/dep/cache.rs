/// Artifact cache storage
///
/// One shared directory of flat files. Each entry is a built binary whose
/// file name is the identity digest of the source it was built from. There is
/// no metadata sidecar and no expiry: a present file is a valid artifact.
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Default cache root: a fixed subdirectory of the platform temp directory,
/// shared across processes and survives until the OS cleans temp storage.
pub fn default_cache_root() -> PathBuf {
    std::env::temp_dir().join("schmiede")
}

/// A cached artifact
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub digest: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_size_bytes: u64,
    pub cache_root: PathBuf,
}

/// Artifact cache manager rooted at one shared directory
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    /// Create a cache handle. Does not touch the filesystem; the root is
    /// created lazily by `ensure_root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the cache root if it does not exist yet. An already-present
    /// root is success.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| Error::CacheRoot {
            path: self.root.clone(),
            source,
        })
    }

    /// Path of the entry for a digest. Pure join, no filesystem access.
    pub fn entry_path(&self, digest: &str) -> PathBuf {
        self.root.join(digest)
    }

    /// Check whether an entry is present. A stat failure other than
    /// not-found is an error, not a miss.
    pub fn probe(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(_) => {
                debug!(path = %path.display(), "cache hit");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "cache miss");
                Ok(false)
            }
            Err(source) => Err(Error::CacheProbe {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// List all entries in the cache root, sorted by digest
    ///
    /// Only files with digest-shaped names count; staging files from
    /// in-flight builds are skipped.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        if !self.root.exists() {
            return Ok(entries);
        }

        let read_dir = fs::read_dir(&self.root).map_err(|source| Error::CacheRead {
            path: self.root.clone(),
            source,
        })?;

        for entry in read_dir {
            let entry = entry.map_err(|source| Error::CacheRead {
                path: self.root.clone(),
                source,
            })?;

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if !is_digest(&name) {
                continue;
            }

            let metadata = entry.metadata().map_err(|source| Error::CacheProbe {
                path: entry.path(),
                source,
            })?;
            if !metadata.is_file() {
                continue;
            }

            entries.push(CacheEntry {
                digest: name,
                path: entry.path(),
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        entries.sort_by(|a, b| a.digest.cmp(&b.digest));
        Ok(entries)
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let entries = self.entries()?;
        Ok(CacheStats {
            total_entries: entries.len(),
            total_size_bytes: entries.iter().map(|e| e.size_bytes).sum(),
            cache_root: self.root.clone(),
        })
    }

    /// Remove one entry. Returns whether an entry was actually removed.
    pub fn remove(&self, digest: &str) -> Result<bool> {
        let path = self.entry_path(digest);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(Error::CacheRemove { path, source }),
        }
    }

    /// Remove every entry. Returns how many were removed. Leaves the root
    /// directory itself (and any in-flight staging files) in place.
    pub fn clean_all(&self) -> Result<usize> {
        let entries = self.entries()?;
        let mut removed = 0;
        for entry in &entries {
            if self.remove(&entry.digest)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// An entry name is 64 lowercase hex characters
fn is_digest(name: &str) -> bool {
    name.len() == 64
        && name
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dep::key::identity_digest;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_root_creates_and_tolerates_existing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("cache");

        let cache = ArtifactCache::new(root.clone());
        cache.ensure_root().unwrap();
        assert!(root.is_dir());

        // Second call against the existing directory succeeds
        cache.ensure_root().unwrap();
    }

    #[test]
    fn test_ensure_root_fails_when_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("occupied");
        fs::write(&root, b"not a directory").unwrap();

        let cache = ArtifactCache::new(root.clone());
        let err = cache.ensure_root().unwrap_err();
        match err {
            Error::CacheRoot { path, .. } => assert_eq!(path, root),
            other => panic!("expected CacheRoot, got: {other}"),
        }
    }

    #[test]
    fn test_entry_path_joins_digest() {
        let cache = ArtifactCache::new(PathBuf::from("/tmp/cache"));
        let digest = identity_digest("repo", "commit");
        assert_eq!(cache.entry_path(&digest), PathBuf::from("/tmp/cache").join(&digest));
    }

    #[test]
    fn test_probe_hit_and_miss() {
        let temp = TempDir::new().unwrap();
        let cache = ArtifactCache::new(temp.path().to_path_buf());

        let digest = identity_digest("repo", "commit");
        let path = cache.entry_path(&digest);
        assert!(!cache.probe(&path).unwrap());

        fs::write(&path, b"binary").unwrap();
        assert!(cache.probe(&path).unwrap());
    }

    #[test]
    fn test_probe_stat_failure_is_an_error_not_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = ArtifactCache::new(temp.path().to_path_buf());

        // A regular file in place of a parent directory makes the stat fail
        // with something other than not-found
        fs::write(temp.path().join("blocker"), b"file").unwrap();
        let path = temp.path().join("blocker").join("x");

        let err = cache.probe(&path).unwrap_err();
        match err {
            Error::CacheProbe { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected CacheProbe, got: {other}"),
        }
    }

    #[test]
    fn test_entries_skips_staging_files() {
        let temp = TempDir::new().unwrap();
        let cache = ArtifactCache::new(temp.path().to_path_buf());

        let digest = identity_digest("repo", "commit");
        fs::write(cache.entry_path(&digest), b"artifact").unwrap();
        fs::write(temp.path().join(format!("{digest}.tmp.123.4")), b"partial").unwrap();

        let entries = cache.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].digest, digest);
        assert_eq!(entries[0].size_bytes, 8);
    }

    #[test]
    fn test_entries_on_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let cache = ArtifactCache::new(temp.path().join("never-created"));
        assert!(cache.entries().unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_clean_all() {
        let temp = TempDir::new().unwrap();
        let cache = ArtifactCache::new(temp.path().to_path_buf());

        let a = identity_digest("repo-a", "c1");
        let b = identity_digest("repo-b", "c2");
        fs::write(cache.entry_path(&a), b"a").unwrap();
        fs::write(cache.entry_path(&b), b"b").unwrap();

        assert!(cache.remove(&a).unwrap());
        assert!(!cache.remove(&a).unwrap());

        assert_eq!(cache.clean_all().unwrap(), 1);
        assert!(cache.entries().unwrap().is_empty());
        assert!(temp.path().is_dir());
    }

    #[test]
    fn test_stats_accumulates_sizes() {
        let temp = TempDir::new().unwrap();
        let cache = ArtifactCache::new(temp.path().to_path_buf());

        fs::write(cache.entry_path(&identity_digest("r1", "")), vec![0u8; 10]).unwrap();
        fs::write(cache.entry_path(&identity_digest("r2", "")), vec![0u8; 30]).unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_size_bytes, 40);
        assert_eq!(stats.cache_root, temp.path());
    }
}
