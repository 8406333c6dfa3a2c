use crate::report::EntityReport;
use crate::types::LocateRequest;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

/// Identity of a source file's content as seen by `stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct CachedReport {
    fingerprint: Fingerprint,
    report: EntityReport,
}

/// Memoized entity reports, invalidated when the source file changes.
///
/// Purely an optimization: a miss always falls back to a full analysis that
/// yields the same report.
pub struct AnalysisCache {
    entries: Option<Mutex<LruCache<LocateRequest, CachedReport>>>,
}

impl AnalysisCache {
    /// Capacity 0 disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Cached report for `request`, if its source file is unchanged.
    ///
    /// Only requests naming a file are memoized. A project scan can resolve
    /// to a different file once another one gains a matching definition, and
    /// the fingerprint of the previously found file cannot see that.
    pub fn get(&self, request: &LocateRequest) -> Option<EntityReport> {
        if !Self::is_cacheable(request) {
            return None;
        }
        let entries = self.entries.as_ref()?;
        let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);

        let entry = entries.get(request)?;
        let current = Fingerprint::of(&entry.report.location.file_path);
        if current == Some(entry.fingerprint) {
            log::info!("Cache hit for '{}'", request.entity_name);
            return Some(entry.report.clone());
        }

        log::debug!("Cache entry for '{}' is stale", request.entity_name);
        entries.pop(request);
        None
    }

    pub fn insert(&self, request: LocateRequest, report: &EntityReport) {
        let Some(entries) = self.entries.as_ref() else {
            return;
        };
        if !Self::is_cacheable(&request) {
            log::debug!("Not caching project scan for '{}'", request.entity_name);
            return;
        }
        let Some(fingerprint) = Fingerprint::of(&report.location.file_path) else {
            return;
        };
        entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(
                request,
                CachedReport {
                    fingerprint,
                    report: report.clone(),
                },
            );
    }

    fn is_cacheable(request: &LocateRequest) -> bool {
        request.file_path.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| {
            entries.lock().unwrap_or_else(PoisonError::into_inner).len()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
