use std::fmt;
use std::path::PathBuf;

use crate::foundation::core::{Direction, FrameRef};

/// A recoverable problem met during a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildWarning {
    /// A referenced frame has no file; every slot using it stays transparent.
    MissingSourceFrame {
        /// The missing frame.
        frame: FrameRef,
        /// Where it was expected.
        path: PathBuf,
    },
    /// A frame file could not be decoded; every slot using it stays transparent.
    DecodeFailed {
        /// The offending frame.
        frame: FrameRef,
        /// Decoder message.
        reason: String,
    },
    /// The remote classifier failed and the local heuristic was used.
    ClassificationFallback {
        /// Frame classified locally.
        frame: FrameRef,
        /// Service failure.
        reason: String,
    },
    /// A processed tile ended up with no opaque pixel at all.
    TransparentTile {
        /// Flattened index of the tile.
        index: usize,
        /// Direction the tile belongs to.
        direction: Direction,
    },
}

/// Discriminant of [`BuildWarning`], for counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// [`BuildWarning::MissingSourceFrame`].
    MissingSourceFrame,
    /// [`BuildWarning::DecodeFailed`].
    DecodeFailed,
    /// [`BuildWarning::ClassificationFallback`].
    ClassificationFallback,
    /// [`BuildWarning::TransparentTile`].
    TransparentTile,
}

impl BuildWarning {
    /// Discriminant of this warning.
    pub fn kind(&self) -> WarningKind {
        match self {
            Self::MissingSourceFrame { .. } => WarningKind::MissingSourceFrame,
            Self::DecodeFailed { .. } => WarningKind::DecodeFailed,
            Self::ClassificationFallback { .. } => WarningKind::ClassificationFallback,
            Self::TransparentTile { .. } => WarningKind::TransparentTile,
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSourceFrame { frame, path } => {
                write!(f, "missing source frame {frame} ({})", path.display())
            }
            Self::DecodeFailed { frame, reason } => write!(f, "cannot decode {frame}: {reason}"),
            Self::ClassificationFallback { frame, reason } => {
                write!(f, "local fallback for {frame}: {reason}")
            }
            Self::TransparentTile { index, direction } => {
                write!(f, "tile {index} ({direction}) is fully transparent")
            }
        }
    }
}

/// Statistics and warnings of one sheet build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Name of the sheet.
    pub sheet: String,
    /// Classifier that processed the frames.
    pub classifier: String,
    /// Flattened frame count.
    pub frames_total: usize,
    /// Distinct frame references.
    pub unique_frames: usize,
    /// Frames actually processed in this build.
    pub frames_processed: usize,
    /// Frames reused from the cache.
    pub cache_hits: usize,
    /// Canvas size in pixels.
    pub canvas: (u32, u32),
    /// FNV-1a fingerprint of the canvas pixels.
    pub fingerprint: u64,
    /// Recoverable problems, in flattened-index order of first use.
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    /// Number of warnings of `kind`.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind() == kind).count()
    }

    /// `true` when the build met no problem.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "sheet '{}': {}x{} px, {} frames ({} unique, {} processed, {} cached), classifier {}",
            self.sheet,
            self.canvas.0,
            self.canvas.1,
            self.frames_total,
            self.unique_frames,
            self.frames_processed,
            self.cache_hits,
            self.classifier,
        )?;
        writeln!(f, "fingerprint {:016x}", self.fingerprint)?;
        if self.warnings.is_empty() {
            return write!(f, "no warnings");
        }
        write!(
            f,
            "{} warning(s): {} missing, {} undecodable, {} fallback, {} transparent",
            self.warnings.len(),
            self.count(WarningKind::MissingSourceFrame),
            self.count(WarningKind::DecodeFailed),
            self.count(WarningKind::ClassificationFallback),
            self.count(WarningKind::TransparentTile),
        )?;
        for w in &self.warnings {
            write!(f, "\n  - {w}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/report.rs"]
mod tests;
