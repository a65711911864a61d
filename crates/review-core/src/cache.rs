//! Build caches
//!
//! Caches are injected explicitly and invalidated per build identifier. The
//! directory cache stores one record per build variant and doubles as the
//! on-disk input format (`--save-dir` / `--input`).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ReviewError, Result};
use crate::logging::CacheMetrics;
use crate::model::{Build, BuildId, BuildKey, RawBuild};

pub trait BuildCache {
    fn get(&self, key: &BuildKey) -> Result<Option<Build>>;

    fn put(&mut self, build: &Build) -> Result<()>;

    /// Drop every variant of a build, returning how many entries went away
    fn invalidate(&mut self, id: &BuildId) -> Result<usize>;

    fn metrics(&self) -> &CacheMetrics;
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<BuildKey, Build>,
    metrics: CacheMetrics,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BuildCache for MemoryCache {
    fn get(&self, key: &BuildKey) -> Result<Option<Build>> {
        let hit = self.entries.get(key).cloned();
        if hit.is_some() {
            self.metrics.record_cache_hit();
        } else {
            self.metrics.record_cache_miss();
        }
        Ok(hit)
    }

    fn put(&mut self, build: &Build) -> Result<()> {
        self.entries.insert(build.key().clone(), build.clone());
        Ok(())
    }

    fn invalidate(&mut self, id: &BuildId) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|key, _| &key.id != id);
        let removed = before - self.entries.len();
        self.metrics.record_invalidations(removed as u64);
        Ok(removed)
    }

    fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

/// One JSON record per build variant under `<root>/<job group>/<build>/`
#[derive(Debug)]
pub struct DirCache {
    root: PathBuf,
    metrics: CacheMetrics,
}

impl DirCache {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| ReviewError::io_operation("create cache directory", root.display(), e))?;
        Ok(DirCache {
            root,
            metrics: CacheMetrics::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &BuildKey) -> PathBuf {
        self.root
            .join(slug::slugify(&key.job_group))
            .join(slug::slugify(key.id.as_str()))
            .join(format!("{}.json", slug::slugify(key.variant())))
    }

    /// Every record file below the root, parsed, in path order
    ///
    /// Unreadable files are returned as errors next to their path so callers
    /// can skip them individually.
    pub fn entries(&self) -> Vec<(PathBuf, Result<RawBuild>)> {
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable cache entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| RawBuild::is_record_path(path))
            .collect();
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let record = RawBuild::from_path(&path);
                (path, record)
            })
            .collect()
    }

    /// Key of the record at `path`, if it exists and is readable
    fn stored_key(&self, path: &Path) -> Option<BuildKey> {
        if !path.exists() {
            return None;
        }
        let source = path.display().to_string();
        RawBuild::from_path(path)
            .and_then(|raw| Build::load(&source, &raw))
            .map(|build| build.key().clone())
            .ok()
    }
}

impl BuildCache for DirCache {
    fn get(&self, key: &BuildKey) -> Result<Option<Build>> {
        let path = self.path_for(key);
        if !path.exists() {
            self.metrics.record_cache_miss();
            return Ok(None);
        }

        let raw = RawBuild::from_path(&path)?;
        let build = Build::load(&path.display().to_string(), &raw)?;
        if build.key() != key {
            // Slug collision between two different keys
            self.metrics.record_cache_miss();
            return Ok(None);
        }

        self.metrics.record_cache_hit();
        Ok(Some(build))
    }

    /// Refuses to replace a record stored for a different key
    fn put(&mut self, build: &Build) -> Result<()> {
        let path = self.path_for(build.key());
        if let Some(stored) = self.stored_key(&path) {
            if &stored != build.key() {
                return Err(ReviewError::io_operation(
                    "write",
                    path.display(),
                    format!("file already holds {}", stored),
                ));
            }
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ReviewError::io_operation("create", parent.display(), e))?;
        }
        let content = serde_json::to_string_pretty(&build.to_raw())?;
        fs::write(&path, content).map_err(|e| ReviewError::io_operation("write", path.display(), e))?;
        tracing::debug!(path = %path.display(), "cached build");
        Ok(())
    }

    fn invalidate(&mut self, id: &BuildId) -> Result<usize> {
        let mut removed = 0;
        for (path, record) in self.entries() {
            let Ok(raw) = record else {
                continue;
            };
            let matches = raw
                .id
                .as_ref()
                .is_some_and(|raw_id| &BuildId::new(raw_id.to_string()) == id);
            if matches {
                fs::remove_file(&path)
                    .map_err(|e| ReviewError::io_operation("remove", path.display(), e))?;
                removed += 1;
            }
        }
        self.metrics.record_invalidations(removed as u64);
        Ok(removed)
    }

    fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}
