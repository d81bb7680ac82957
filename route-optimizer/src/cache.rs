//! Disk-backed cache for directions responses.
//!
//! Every directions call costs money, so normalized route records are kept
//! on disk keyed by a fingerprint of the semantic request parameters. Each
//! entry lives in its own `<key>.json` file holding the write timestamp and
//! the record.
//!
//! Lookups never fail: a missing, expired or unreadable entry is reported as
//! a [`CacheLookup`] variant, and expired or unreadable files are deleted as
//! part of the lookup.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::RouteRecord;

/// Default cache TTL: 30 days.
const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default cache directory, relative to the working directory.
const DEFAULT_DIR: &str = ".cache";

/// Fingerprint of a directions request.
///
/// Built from the semantic request parameters only. Parameters are sorted
/// by name before hashing, so the order they are supplied in never changes
/// the key.
///
/// # Examples
///
/// ```
/// use route_optimizer::cache::RequestKey;
///
/// let a = RequestKey::from_params([("origin", "Depot"), ("mode", "driving")]);
/// let b = RequestKey::from_params([("mode", "driving"), ("origin", "Depot")]);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    /// Hash a set of request parameters.
    ///
    /// The parameters are serialized as a compact JSON object with keys in
    /// lexicographic order and hashed with SHA-256. If a name appears more
    /// than once the last value wins.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut sorted: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted.dedup_by(|later, earlier| {
            if later.0 == earlier.0 {
                std::mem::swap(&mut earlier.1, &mut later.1);
                true
            } else {
                false
            }
        });

        let canonical: serde_json::Map<String, serde_json::Value> = sorted
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        let json = serde_json::Value::Object(canonical).to_string();

        Self(hex::encode(Sha256::digest(json.as_bytes())))
    }

    /// The key as a lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant (for tests and replays).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one JSON file per entry.
    pub dir: PathBuf,
    /// How long an entry remains valid.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Create a new cache config with the given directory and default TTL (30 days).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DIR)
    }
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A fresh entry was found.
    Hit(RouteRecord),
    /// No entry exists for the key.
    Miss,
    /// An entry existed but was older than the TTL. It has been deleted.
    Expired,
    /// An entry existed but could not be read or parsed. It has been deleted.
    Corrupt,
}

impl CacheLookup {
    /// The cached record, if the lookup was a hit.
    pub fn into_record(self) -> Option<RouteRecord> {
        match self {
            CacheLookup::Hit(record) => Some(record),
            CacheLookup::Miss | CacheLookup::Expired | CacheLookup::Corrupt => None,
        }
    }

    /// Returns true for [`CacheLookup::Hit`].
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }
}

/// Errors from cache writes and maintenance.
///
/// Reads never produce these; see [`CacheLookup`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache directory could not be created.
    #[error("failed to create cache directory '{}': {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// An entry could not be serialized.
    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An entry could not be written or moved into place.
    #[error("failed to write cache entry '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The cache directory could not be listed or an entry removed.
    #[error("failed to clear cache directory '{}': {source}", .path.display())]
    Clear { path: PathBuf, source: io::Error },
}

/// Entry as written to disk.
#[derive(Serialize)]
struct StoredEntry<'a> {
    timestamp: DateTime<Utc>,
    data: &'a RouteRecord,
}

/// Entry as read back from disk.
#[derive(Deserialize)]
struct LoadedEntry {
    timestamp: DateTime<Utc>,
    data: RouteRecord,
}

/// File-per-key cache of route records.
#[derive(Clone)]
pub struct RouteCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RouteCache {
    /// Create a cache using wall-clock time.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for timestamps and expiry.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Ensure the cache directory exists.
    ///
    /// Safe to call repeatedly, and from several processes at once.
    pub fn init(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.config.dir).map_err(|source| CacheError::CreateDir {
            path: self.config.dir.clone(),
            source,
        })
    }

    /// Compute the key for a set of request parameters.
    pub fn key<I, K, V>(&self, params: I) -> RequestKey
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        RequestKey::from_params(params)
    }

    /// Look up an entry.
    ///
    /// Expired and unreadable entries are deleted before returning
    /// [`CacheLookup::Expired`] or [`CacheLookup::Corrupt`].
    pub fn get(&self, key: &RequestKey) -> CacheLookup {
        let path = self.entry_path(key);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return CacheLookup::Miss,
            Err(err) => {
                debug!(%key, error = %err, "unreadable cache entry");
                self.discard(&path);
                return CacheLookup::Corrupt;
            }
        };

        let entry = match serde_json::from_str::<LoadedEntry>(&contents) {
            Ok(entry) if entry.data.is_well_formed() => entry,
            Ok(_) => {
                debug!(%key, "cache entry failed validation");
                self.discard(&path);
                return CacheLookup::Corrupt;
            }
            Err(err) => {
                debug!(%key, error = %err, "malformed cache entry");
                self.discard(&path);
                return CacheLookup::Corrupt;
            }
        };

        let ttl = TimeDelta::from_std(self.config.ttl).unwrap_or(TimeDelta::MAX);
        let expired = entry
            .timestamp
            .checked_add_signed(ttl)
            .is_some_and(|expires_at| self.clock.now() > expires_at);
        if expired {
            debug!(%key, stored_at = %entry.timestamp, "cache entry expired");
            self.discard(&path);
            return CacheLookup::Expired;
        }

        CacheLookup::Hit(entry.data)
    }

    /// Store a record, replacing any existing entry for the key.
    ///
    /// The entry is written to a temporary file in the cache directory and
    /// renamed into place, so readers never see a partial entry.
    pub fn put(&self, key: &RequestKey, record: &RouteRecord) -> Result<(), CacheError> {
        self.init()?;

        let entry = StoredEntry {
            timestamp: self.clock.now(),
            data: record,
        };
        let json = serde_json::to_string_pretty(&entry)?;

        let path = self.entry_path(key);
        let write_err = |source| CacheError::Write {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.config.dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|err| write_err(err.error))?;

        debug!(%key, "cached route");
        Ok(())
    }

    /// Delete every entry in the cache directory.
    ///
    /// Returns the number of entries removed. A missing directory counts as
    /// an empty cache.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let clear_err = |source| CacheError::Clear {
            path: self.config.dir.clone(),
            source,
        };

        let entries = match fs::read_dir(&self.config.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(clear_err(err)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(clear_err)?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                fs::remove_file(&path).map_err(clear_err)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Path of the file backing `key`.
    pub fn entry_path(&self, key: &RequestKey) -> PathBuf {
        self.config.dir.join(format!("{key}.json"))
    }

    /// Get the cache directory.
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Get the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    fn discard(&self, path: &Path) {
        if let Err(err) = fs::remove_file(path)
            && err.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %err, "failed to delete stale cache entry");
        }
    }
}
