use std::collections::BTreeSet;

use image::RgbaImage;

use crate::classify::BackgroundClassifier;
use crate::config::model::SheetSpec;
use crate::foundation::core::FrameRef;
use crate::foundation::error::SheetResult;
use crate::foundation::math::fingerprint_rgba8;
use crate::layout::index::{DirectionIndexTable, check_lockstep};
use crate::render::composite::{cell_is_transparent, composite_sheet};
use crate::session::cache::{CacheProfile, CachedFrame, FrameCache, FrameFailure};
use crate::session::process::{Threading, process_unique};
use crate::session::report::{BuildReport, BuildWarning};

/// Result of one sheet build: the canvas, its index table and the report.
#[derive(Clone, Debug)]
pub struct SheetBuild {
    /// Composited sheet.
    pub sheet: RgbaImage,
    /// Direction ranges matching the sheet cell for cell.
    pub index: DirectionIndexTable,
    /// Statistics and warnings.
    pub report: BuildReport,
}

/// Builds one sheet from a validated [`SheetSpec`].
pub struct SheetBuilder<'a> {
    spec: &'a SheetSpec,
    classifier: &'a dyn BackgroundClassifier,
    threading: Threading,
}

impl<'a> SheetBuilder<'a> {
    /// Builder using `classifier` for every frame, processing serially.
    pub fn new(spec: &'a SheetSpec, classifier: &'a dyn BackgroundClassifier) -> Self {
        Self {
            spec,
            classifier,
            threading: Threading::serial(),
        }
    }

    /// Select serial or rayon-parallel frame processing.
    pub fn with_threading(mut self, threading: Threading) -> Self {
        self.threading = threading;
        self
    }

    /// Run the pipeline: lock-step check, process unique frames, composite, flag empty tiles.
    ///
    /// Only configuration problems fail the build. Missing or undecodable frames leave their
    /// cells transparent and are reported once per distinct frame.
    #[tracing::instrument(skip_all, fields(sheet = %self.spec.name, classifier = self.classifier.name()))]
    pub fn build(&self, cache: &mut FrameCache) -> SheetResult<SheetBuild> {
        let layout = &self.spec.layout;
        let index = DirectionIndexTable::from_layout(layout);
        check_lockstep(layout, &index)?;

        cache.bind(CacheProfile {
            tile_size: layout.tile_size(),
            classifier: self.classifier.cache_key(),
        });

        let unique = layout.unique_frames();
        let cache_hits = unique.iter().filter(|f| cache.get(f).is_some()).count();
        tracing::info!(
            frames = layout.total_frames(),
            unique = unique.len(),
            cached = cache_hits,
            parallel = self.threading.parallel,
            "building sheet"
        );

        let frames_processed = process_unique(
            &unique,
            &self.spec.source,
            self.classifier,
            layout.tile_size(),
            self.threading,
            cache,
        )?;

        let mut warnings = Vec::new();
        let mut reported = BTreeSet::<&FrameRef>::new();
        let mut tiles = Vec::with_capacity(layout.total_frames());
        for slot in layout.slots() {
            let outcome = cache.peek(slot.frame);
            if reported.insert(slot.frame)
                && let Some(w) = outcome.and_then(|o| frame_warning(slot.frame, o))
            {
                warnings.push(w);
            }
            tiles.push(outcome.and_then(CachedFrame::tile));
        }

        let sheet = composite_sheet(layout, &tiles)?;

        for slot in layout.slots() {
            if tiles[slot.index].is_some() && cell_is_transparent(&sheet, layout, slot.index) {
                warnings.push(BuildWarning::TransparentTile {
                    index: slot.index,
                    direction: slot.direction,
                });
            }
        }
        for w in &warnings {
            tracing::warn!("{w}");
        }

        let (w, h) = sheet.dimensions();
        let report = BuildReport {
            sheet: self.spec.name.clone(),
            classifier: self.classifier.name().to_string(),
            frames_total: layout.total_frames(),
            unique_frames: unique.len(),
            frames_processed,
            cache_hits,
            canvas: (w, h),
            fingerprint: fingerprint_rgba8(w, h, sheet.as_raw()),
            warnings,
        };
        tracing::info!(
            warnings = report.warnings.len(),
            fingerprint = %format!("{:016x}", report.fingerprint),
            "sheet built"
        );

        Ok(SheetBuild {
            sheet,
            index,
            report,
        })
    }
}

fn frame_warning(frame: &FrameRef, outcome: &CachedFrame) -> Option<BuildWarning> {
    match outcome {
        CachedFrame::Failed(FrameFailure::Missing { path }) => {
            Some(BuildWarning::MissingSourceFrame {
                frame: frame.clone(),
                path: path.clone(),
            })
        }
        CachedFrame::Failed(FrameFailure::Undecodable { reason, .. }) => {
            Some(BuildWarning::DecodeFailed {
                frame: frame.clone(),
                reason: reason.clone(),
            })
        }
        CachedFrame::Ready {
            fallback: Some(reason),
            ..
        } => Some(BuildWarning::ClassificationFallback {
            frame: frame.clone(),
            reason: reason.clone(),
        }),
        CachedFrame::Ready { fallback: None, .. } => None,
    }
}

/// Build `spec` with its configured classifier and a fresh cache.
pub fn build_sheet(spec: &SheetSpec, threading: Threading) -> SheetResult<SheetBuild> {
    let classifier = spec.classifier.build()?;
    let mut cache = FrameCache::new();
    SheetBuilder::new(spec, classifier.as_ref())
        .with_threading(threading)
        .build(&mut cache)
}

#[cfg(test)]
#[path = "../../tests/unit/session/build.rs"]
mod tests;
