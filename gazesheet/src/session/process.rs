use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::source::FrameSource;
use crate::classify::BackgroundClassifier;
use crate::foundation::core::FrameRef;
use crate::foundation::error::{SheetError, SheetResult};
use crate::render::normalize::normalize_tile;
use crate::session::cache::{CachedFrame, FrameCache, FrameFailure};

/// How unique frames are processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Threading {
    /// Process frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Threading {
    /// Single-threaded processing.
    pub fn serial() -> Self {
        Self::default()
    }

    /// Parallel processing with an optional worker count.
    pub fn parallel(threads: Option<usize>) -> Self {
        Self {
            parallel: true,
            threads,
        }
    }
}

/// Load, classify and normalize one frame.
///
/// A missing or undecodable file is a recorded failure, not an error. Only an unresolvable
/// reference (unknown source) is returned as `Err`.
pub fn process_frame(
    source: &FrameSource,
    classifier: &dyn BackgroundClassifier,
    tile_size: u32,
    frame: &FrameRef,
) -> SheetResult<CachedFrame> {
    let path = source.path_for(frame)?;
    let img = match source.load(frame) {
        Ok(img) => img,
        Err(SheetError::MissingSource(_)) => {
            return Ok(CachedFrame::Failed(FrameFailure::Missing { path }));
        }
        Err(SheetError::Config(msg)) => return Err(SheetError::Config(msg)),
        Err(e) => {
            return Ok(CachedFrame::Failed(FrameFailure::Undecodable {
                path,
                reason: e.to_string(),
            }));
        }
    };

    let classified = classifier.classify(&img);
    let tile = normalize_tile(&classified.image, tile_size);
    tracing::debug!(
        %frame,
        classifier = classifier.name(),
        src_w = img.width(),
        src_h = img.height(),
        fallback = classified.fallback.is_some(),
        "processed frame"
    );
    Ok(CachedFrame::Ready {
        tile: Arc::new(tile),
        fallback: classified.fallback,
    })
}

/// Process every frame in `frames` that the cache does not hold yet.
///
/// Results enter the cache in the order of `frames` regardless of threading. Returns how many
/// frames were processed.
pub(crate) fn process_unique(
    frames: &[&FrameRef],
    source: &FrameSource,
    classifier: &dyn BackgroundClassifier,
    tile_size: u32,
    threading: Threading,
    cache: &mut FrameCache,
) -> SheetResult<usize> {
    let todo: Vec<&FrameRef> = frames
        .iter()
        .copied()
        .filter(|f| !cache.contains(f))
        .collect();
    if todo.is_empty() {
        return Ok(0);
    }

    let results: Vec<SheetResult<CachedFrame>> = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            todo.par_iter()
                .map(|f| process_frame(source, classifier, tile_size, f))
                .collect()
        })
    } else {
        todo.iter()
            .map(|f| process_frame(source, classifier, tile_size, f))
            .collect()
    };

    for (frame, r) in todo.iter().zip(results) {
        cache.insert((*frame).clone(), r?);
    }
    Ok(todo.len())
}

fn build_thread_pool(threads: Option<usize>) -> SheetResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SheetError::config("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SheetError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/process.rs"]
mod tests;
