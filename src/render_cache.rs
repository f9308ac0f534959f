//! Shared cache for rendered page bitmaps.
//!
//! Rasterization lives outside this crate, but its cache is specified here
//! because it is the one shared mutable surface in the system: keyed by
//! `(path, page, dpi, last_write_time)` so a re-saved file never serves
//! stale pixels, bounded by both an entry count and a byte budget, evicting
//! least-recently-used entries first. The redaction path itself never reads
//! it.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Cache key: identity of one rendered page image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    /// Source file path
    pub path: PathBuf,
    /// Page index
    pub page_index: usize,
    /// Render DPI, quantized to a tenth to avoid float-key jitter
    pub dpi_tenths: u32,
    /// File modification time when rendered
    pub last_write_time: SystemTime,
}

impl RenderKey {
    /// Build a key from a float DPI.
    pub fn new(path: PathBuf, page_index: usize, dpi: f64, last_write_time: SystemTime) -> Self {
        Self {
            path,
            page_index,
            dpi_tenths: (dpi * 10.0).round() as u32,
            last_write_time,
        }
    }
}

/// A cached rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Raw pixel data (format is the renderer's concern)
    pub pixels: Arc<Vec<u8>>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl RenderedPage {
    fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

/// Concurrency-safe LRU render cache with entry and byte budgets.
#[derive(Debug)]
pub struct RenderCache {
    inner: Mutex<Inner>,
    byte_budget: usize,
}

#[derive(Debug)]
struct Inner {
    entries: LruCache<RenderKey, RenderedPage>,
    bytes_used: usize,
}

impl RenderCache {
    /// Create a cache bounded by `max_entries` and `byte_budget`.
    pub fn new(max_entries: usize, byte_budget: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).expect("max(1) is non-zero");
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                bytes_used: 0,
            }),
            byte_budget,
        }
    }

    /// Fetch a page, marking it most-recently-used.
    pub fn get(&self, key: &RenderKey) -> Option<RenderedPage> {
        let mut inner = self.inner.lock().expect("render cache poisoned");
        inner.entries.get(key).cloned()
    }

    /// Insert a rendered page, evicting LRU entries past either budget.
    pub fn insert(&self, key: RenderKey, page: RenderedPage) {
        let mut inner = self.inner.lock().expect("render cache poisoned");

        if let Some(previous) = inner.entries.pop(&key) {
            inner.bytes_used -= previous.byte_size();
        }

        inner.bytes_used += page.byte_size();
        // push reports the entry the LruCache evicted to stay within its
        // entry budget, which keeps the byte accounting honest.
        if let Some((_, evicted)) = inner.entries.push(key, page) {
            inner.bytes_used -= evicted.byte_size();
        }

        // The LruCache itself enforces the entry budget; enforce bytes here.
        while inner.bytes_used > self.byte_budget && inner.entries.len() > 1 {
            if let Some((_, evicted)) = inner.entries.pop_lru() {
                inner.bytes_used -= evicted.byte_size();
            } else {
                break;
            }
        }
    }

    /// Drop every entry for a path (e.g. after the file was rewritten).
    pub fn invalidate_path(&self, path: &std::path::Path) {
        let mut inner = self.inner.lock().expect("render cache poisoned");
        let stale: Vec<RenderKey> = inner
            .entries
            .iter()
            .filter(|(key, _)| key.path == path)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            if let Some(evicted) = inner.entries.pop(&key) {
                inner.bytes_used -= evicted.byte_size();
            }
        }
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("render cache poisoned").entries.len()
    }

    /// True when the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently held.
    pub fn bytes_used(&self) -> usize {
        self.inner.lock().expect("render cache poisoned").bytes_used
    }
}
