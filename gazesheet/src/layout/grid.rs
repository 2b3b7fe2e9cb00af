use std::collections::BTreeSet;

use crate::foundation::core::{Direction, FrameRef, GridShape};
use crate::foundation::error::{SheetError, SheetResult};

/// Largest RGBA8 canvas a layout may describe (a 16384x16384 sheet).
pub const MAX_CANVAS_BYTES: u64 = 1 << 30;

/// Ordered frames for one direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionRun {
    /// Direction label.
    pub direction: Direction,
    /// Frames in animation order.
    pub frames: Vec<FrameRef>,
}

/// One cell assignment in flattened order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot<'a> {
    /// Flattened index.
    pub index: usize,
    /// Direction the frame belongs to.
    pub direction: Direction,
    /// Position of the frame inside its direction run.
    pub step: usize,
    /// Source frame.
    pub frame: &'a FrameRef,
}

/// Validated grid placement of every direction run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    tile_size: u32,
    grid: GridShape,
    runs: Vec<DirectionRun>,
}

impl SheetLayout {
    /// Build a layout, rejecting anything that would break the index/pixel lock-step.
    pub fn new(tile_size: u32, grid: GridShape, runs: Vec<DirectionRun>) -> SheetResult<Self> {
        if tile_size == 0 {
            return Err(SheetError::config("tile_size must be > 0"));
        }
        if grid.cols == 0 || grid.rows == 0 {
            return Err(SheetError::config("grid cols and rows must be > 0"));
        }
        let (Some(width), Some(height)) = (
            grid.cols.checked_mul(tile_size),
            grid.rows.checked_mul(tile_size),
        ) else {
            return Err(SheetError::config("sheet dimensions overflow u32"));
        };
        let canvas_bytes = u64::from(width) * u64::from(height) * 4;
        if canvas_bytes > MAX_CANVAS_BYTES {
            return Err(SheetError::config(format!(
                "a {width}x{height} px sheet needs {canvas_bytes} bytes; the limit is {MAX_CANVAS_BYTES}"
            )));
        }
        if runs.is_empty() {
            return Err(SheetError::config("direction order must not be empty"));
        }

        let mut seen = BTreeSet::new();
        for run in &runs {
            if !seen.insert(run.direction) {
                return Err(SheetError::config(format!(
                    "direction '{}' appears twice in the order",
                    run.direction
                )));
            }
            if run.frames.is_empty() {
                return Err(SheetError::config(format!(
                    "direction '{}' has no frames",
                    run.direction
                )));
            }
        }

        let expected = runs[0].frames.len();
        if let Some(bad) = runs.iter().find(|r| r.frames.len() != expected) {
            return Err(SheetError::config(format!(
                "direction '{}' has {} frames but '{}' has {expected}; all directions must have the same length",
                bad.direction,
                bad.frames.len(),
                runs[0].direction,
            )));
        }

        let total = expected * runs.len();
        if total > grid.capacity() {
            return Err(SheetError::config(format!(
                "{total} frames do not fit a {}x{} grid ({} cells)",
                grid.cols,
                grid.rows,
                grid.capacity()
            )));
        }

        Ok(Self {
            tile_size,
            grid,
            runs,
        })
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Grid shape in cells.
    pub fn grid(&self) -> GridShape {
        self.grid
    }

    /// Direction runs in sheet order.
    pub fn runs(&self) -> &[DirectionRun] {
        &self.runs
    }

    /// Frames in each direction run (all runs share it).
    pub fn frames_per_direction(&self) -> usize {
        self.runs[0].frames.len()
    }

    /// Total flattened frame count.
    pub fn total_frames(&self) -> usize {
        self.runs.iter().map(|r| r.frames.len()).sum()
    }

    /// Grid cell `(col, row)` of flattened index `i`.
    pub fn cell(&self, i: usize) -> (u32, u32) {
        let cols = self.grid.cols as usize;
        ((i % cols) as u32, (i / cols) as u32)
    }

    /// Pixel offset of the top-left corner of flattened index `i`.
    pub fn offset(&self, i: usize) -> (u32, u32) {
        let (col, row) = self.cell(i);
        (col * self.tile_size, row * self.tile_size)
    }

    /// Output canvas `(width, height)` in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.grid.cols * self.tile_size,
            self.grid.rows * self.tile_size,
        )
    }

    /// All slots in flattened order.
    pub fn slots(&self) -> impl Iterator<Item = Slot<'_>> + '_ {
        self.runs
            .iter()
            .flat_map(|run| {
                run.frames
                    .iter()
                    .enumerate()
                    .map(move |(step, frame)| (run.direction, step, frame))
            })
            .enumerate()
            .map(|(index, (direction, step, frame))| Slot {
                index,
                direction,
                step,
                frame,
            })
    }

    /// Distinct frames referenced by the layout, in `FrameRef` order.
    pub fn unique_frames(&self) -> Vec<&FrameRef> {
        let set: BTreeSet<&FrameRef> = self.runs.iter().flat_map(|r| r.frames.iter()).collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
