use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::FrameRef;

/// Why a frame produced no tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameFailure {
    /// No file at the resolved path.
    Missing {
        /// Path the frame was expected at.
        path: PathBuf,
    },
    /// The file exists but is not a decodable image.
    Undecodable {
        /// Path of the offending file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

/// Outcome of processing one [`FrameRef`], stored once per run.
#[derive(Clone, Debug)]
pub enum CachedFrame {
    /// Classified and normalized tile.
    Ready {
        /// Tile-sized straight-alpha image.
        tile: Arc<RgbaImage>,
        /// Set when the classifier had to use its local fallback.
        fallback: Option<String>,
    },
    /// Recorded failure; the tile stays transparent.
    Failed(FrameFailure),
}

impl CachedFrame {
    /// Processed tile, if any.
    pub fn tile(&self) -> Option<&RgbaImage> {
        match self {
            Self::Ready { tile, .. } => Some(tile.as_ref()),
            Self::Failed(_) => None,
        }
    }
}

/// Processing settings a cache's entries are valid for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CacheProfile {
    pub(crate) tile_size: u32,
    pub(crate) classifier: String,
}

/// Explicit per-run map from [`FrameRef`] to its processed outcome.
///
/// Entries are write-once: a second insert for the same key keeps the first value. Entries are
/// only valid for one tile size and one classifier with its settings; binding a different
/// profile empties the cache.
#[derive(Debug, Default)]
pub struct FrameCache {
    entries: BTreeMap<FrameRef, CachedFrame>,
    profile: Option<CacheProfile>,
    hits: u64,
    misses: u64,
}

impl FrameCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached frames.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Whether `frame` already has an outcome, without touching the counters.
    pub fn contains(&self, frame: &FrameRef) -> bool {
        self.entries.contains_key(frame)
    }

    /// Look up `frame`, counting a hit or a miss.
    pub fn get(&mut self, frame: &FrameRef) -> Option<&CachedFrame> {
        match self.entries.get(frame) {
            Some(v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up `frame` without counting.
    pub fn peek(&self, frame: &FrameRef) -> Option<&CachedFrame> {
        self.entries.get(frame)
    }

    /// Store an outcome; returns `false` (and keeps the old value) if `frame` was present.
    pub fn insert(&mut self, frame: FrameRef, value: CachedFrame) -> bool {
        match self.entries.entry(frame) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(v) => {
                v.insert(value);
                true
            }
        }
    }

    pub(crate) fn bind(&mut self, profile: CacheProfile) {
        if self.profile.as_ref().is_some_and(|p| *p != profile) && !self.entries.is_empty() {
            tracing::debug!(
                cached = self.entries.len(),
                "processing settings changed; dropping cached frames"
            );
            self.entries.clear();
        }
        self.profile = Some(profile);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/cache.rs"]
mod tests;
