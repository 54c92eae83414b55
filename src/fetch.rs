//! Remote schema fetching, disk caching, and lockfile management.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::GenError;

/// Distinguishes local filesystem schema documents from remote URL documents.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum RefSource {
    /// A local file path (already canonicalized).
    Local(PathBuf),
    /// A remote URL with its local cache path.
    Remote { url: String, cache_path: PathBuf },
}

impl RefSource {
    /// Returns a display-friendly identifier (path or URL).
    pub fn display_id(&self) -> String {
        match self {
            RefSource::Local(p) => p.display().to_string(),
            RefSource::Remote { url, .. } => url.clone(),
        }
    }
}

/// Determines whether a raw document reference is a URL or a local filesystem
/// path, and resolves it to a `RefSource`.
pub fn resolve_ref_source(
    base_dir: &Path,
    raw_path: &str,
    ctx: &FetchContext,
) -> Result<RefSource, GenError> {
    let trimmed = raw_path.trim();
    if trimmed.is_empty() {
        return Err(GenError::RefError(
            "schema reference must be a non-empty string".to_string(),
        ));
    }

    if is_url(trimmed) {
        let cache_path = url_cache_path(trimmed, &ctx.cache_dir);
        Ok(RefSource::Remote {
            url: trimmed.to_string(),
            cache_path,
        })
    } else {
        let path = Path::new(trimmed);
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        };
        let canonical = fs::canonicalize(&resolved).map_err(|e| {
            GenError::RefError(format!(
                "failed to resolve schema path '{}': {e}",
                resolved.display()
            ))
        })?;
        Ok(RefSource::Local(canonical))
    }
}

/// Resolves a relative document reference from a parent source.
///
/// If the parent is remote, relative references resolve as relative URLs;
/// local parents resolve against the filesystem.
pub fn resolve_ref_source_from_parent(
    parent: &RefSource,
    raw_path: &str,
    ctx: &FetchContext,
) -> Result<RefSource, GenError> {
    let trimmed = raw_path.trim();
    if is_url(trimmed) {
        let cache_path = url_cache_path(trimmed, &ctx.cache_dir);
        return Ok(RefSource::Remote {
            url: trimmed.to_string(),
            cache_path,
        });
    }

    match parent {
        RefSource::Local(parent_path) => {
            let base_dir = parent_path.parent().ok_or_else(|| {
                GenError::RefError(format!(
                    "failed to resolve parent directory for '{}'",
                    parent_path.display()
                ))
            })?;
            resolve_ref_source(base_dir, trimmed, ctx)
        }
        RefSource::Remote { url, .. } => {
            let resolved_url = resolve_relative_url(&url_directory(url), trimmed);
            let cache_path = url_cache_path(&resolved_url, &ctx.cache_dir);
            Ok(RefSource::Remote {
                url: resolved_url,
                cache_path,
            })
        }
    }
}

/// Reads the content of a schema source, fetching from network if needed.
///
/// Remote sources check the lockfile-pinned cache first; a cache hit must
/// still match the pinned digest. On miss the document is fetched, cached on
/// disk, and pinned in the lockfile.
pub fn read_ref_source(source: &RefSource, ctx: &mut FetchContext) -> Result<String, GenError> {
    match source {
        RefSource::Local(path) => fs::read_to_string(path).map_err(|e| {
            GenError::RefError(format!("failed to read schema '{}': {e}", path.display()))
        }),
        RefSource::Remote { url, cache_path } => {
            if !ctx.force_update {
                if let Some(content) = try_read_cached(cache_path, url, &ctx.lockfile) {
                    return Ok(content);
                }
            }

            let content = fetch_url(url)?;

            fs::create_dir_all(cache_path.parent().unwrap_or(Path::new("."))).map_err(|e| {
                GenError::FetchError(format!("failed to create cache directory: {e}"))
            })?;
            fs::write(cache_path, &content).map_err(|e| {
                GenError::FetchError(format!(
                    "failed to write cache file '{}': {e}",
                    cache_path.display()
                ))
            })?;

            ctx.lockfile.entries.insert(
                url.clone(),
                LockEntry {
                    hash: compute_sha256(content.as_bytes()),
                    cached_path: cache_path.display().to_string(),
                    fetched_at: unix_now(),
                },
            );
            ctx.lockfile_dirty = true;

            Ok(content)
        }
    }
}

/// Flushes the lockfile to disk if it has been modified.
pub fn flush_lockfile(ctx: &FetchContext) -> Result<(), GenError> {
    if !ctx.lockfile_dirty {
        return Ok(());
    }
    if let Some(ref path) = ctx.lockfile_path {
        let json = serde_json::to_string_pretty(&ctx.lockfile)
            .map_err(|e| GenError::FetchError(format!("failed to serialize lockfile: {e}")))?;
        fs::write(path, json).map_err(|e| {
            GenError::FetchError(format!("failed to write lockfile '{}': {e}", path.display()))
        })?;
    }
    Ok(())
}

/// Computes the SHA-256 digest of `content` in `sha256:hex` format.
pub fn compute_sha256(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// FetchContext
// ---------------------------------------------------------------------------

/// Shared context for URL fetching, caching, and lockfile management.
pub struct FetchContext {
    pub cache_dir: PathBuf,
    pub lockfile_path: Option<PathBuf>,
    pub lockfile: Lockfile,
    pub lockfile_dirty: bool,
    pub force_update: bool,
}

impl FetchContext {
    pub fn new(root_dir: &Path, cache_dir: Option<PathBuf>, force_update: bool) -> Self {
        let cache_dir = cache_dir
            .or_else(|| std::env::var("SCHEMA2CLASS_CACHE_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(default_cache_dir);

        let lockfile_path = root_dir.join("schema2class.lock");
        let lockfile = read_lockfile(&lockfile_path);

        Self {
            cache_dir,
            lockfile_path: Some(lockfile_path),
            lockfile,
            lockfile_dirty: false,
            force_update,
        }
    }

    /// Creates a no-op context that disables the lockfile and uses a temp
    /// cache dir.
    pub fn disabled() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("schema2class_cache"),
            lockfile_path: None,
            lockfile: Lockfile::default(),
            lockfile_dirty: false,
            force_update: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Lockfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub entries: BTreeMap<String, LockEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockEntry {
    pub hash: String,
    pub cached_path: String,
    /// Unix timestamp (seconds) of the fetch.
    pub fetched_at: u64,
}

pub fn read_lockfile(path: &Path) -> Lockfile {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Lockfile {
            version: 1,
            ..Default::default()
        })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn default_cache_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("schema2class")
    } else {
        std::env::temp_dir().join(".cache").join("schema2class")
    }
}

fn url_cache_path(url: &str, cache_dir: &Path) -> PathBuf {
    let hash = compute_sha256(url.as_bytes());
    let hex = hash.strip_prefix("sha256:").unwrap_or(&hash);
    let short = &hex[..16.min(hex.len())];
    cache_dir.join(format!("{short}.json"))
}

fn url_directory(url: &str) -> String {
    match url.rfind('/') {
        Some(pos) => url[..=pos].to_string(),
        None => url.to_string(),
    }
}

fn resolve_relative_url(base: &str, relative: &str) -> String {
    if relative.starts_with('/') {
        if let Some(scheme_end) = base.find("://") {
            let after_scheme = &base[scheme_end + 3..];
            if let Some(slash) = after_scheme.find('/') {
                return format!("{}{}", &base[..scheme_end + 3 + slash], relative);
            }
        }
        return format!("{}{}", base.trim_end_matches('/'), relative);
    }

    let mut result = base.to_string();
    for segment in relative.split('/') {
        match segment {
            ".." => {
                if result.ends_with('/') {
                    result.pop();
                }
                if let Some(pos) = result.rfind('/') {
                    result.truncate(pos + 1);
                }
            }
            "." => {}
            other => {
                if !result.ends_with('/') {
                    result.push('/');
                }
                result.push_str(other);
            }
        }
    }
    result
}

fn try_read_cached(cache_path: &Path, url: &str, lockfile: &Lockfile) -> Option<String> {
    let entry = lockfile.entries.get(url)?;
    if !cache_path.exists() {
        return None;
    }
    let content = fs::read_to_string(cache_path).ok()?;
    if compute_sha256(content.as_bytes()) == entry.hash {
        Some(content)
    } else {
        None
    }
}

fn fetch_url(url: &str) -> Result<String, GenError> {
    let body = ureq::get(url)
        .call()
        .map_err(|e| GenError::FetchError(format!("HTTP request to '{url}' failed: {e}")))?
        .into_body()
        .read_to_string()
        .map_err(|e| {
            GenError::FetchError(format!("failed to read response body from '{url}': {e}"))
        })?;
    Ok(body)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
