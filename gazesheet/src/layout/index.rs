use std::fmt::Write as _;

use crate::foundation::core::{Direction, GridShape, IndexRange};
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::grid::SheetLayout;

/// Direction label -> contiguous flattened index range, in sheet order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionIndexTable {
    grid: GridShape,
    tile_size: u32,
    entries: Vec<(Direction, IndexRange)>,
}

impl DirectionIndexTable {
    /// Derive the table from `layout`; `start` is the running sum of prior run lengths.
    pub fn from_layout(layout: &SheetLayout) -> Self {
        let mut start = 0usize;
        let mut entries = Vec::with_capacity(layout.runs().len());
        for run in layout.runs() {
            let end = start + run.frames.len();
            entries.push((run.direction, IndexRange { start, end }));
            start = end;
        }
        Self {
            grid: layout.grid(),
            tile_size: layout.tile_size(),
            entries,
        }
    }

    /// Entries in sheet order.
    pub fn entries(&self) -> &[(Direction, IndexRange)] {
        &self.entries
    }

    /// Range for `direction`, if it is part of the sheet.
    pub fn range(&self, direction: Direction) -> Option<IndexRange> {
        self.entries
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, r)| *r)
    }

    /// Direction owning flattened index `i`.
    pub fn direction_at(&self, i: usize) -> Option<Direction> {
        self.entries
            .iter()
            .find(|(_, r)| r.contains(i))
            .map(|(d, _)| *d)
    }

    /// One past the last index covered.
    pub fn total(&self) -> usize {
        self.entries.last().map_or(0, |(_, r)| r.end)
    }

    /// Render engine constants: grid shape, tile size and one `Array[int]` per direction.
    pub fn to_gdscript(&self, prefix: &str) -> String {
        let prefix = prefix.to_ascii_uppercase();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# {}x{} grid, {} frames",
            self.grid.cols,
            self.grid.rows,
            self.total()
        );
        let _ = writeln!(out, "const {prefix}_COLS: int = {}", self.grid.cols);
        let _ = writeln!(out, "const {prefix}_ROWS: int = {}", self.grid.rows);
        let _ = writeln!(out, "const {prefix}_TILE: int = {}", self.tile_size);
        out.push('\n');
        for (direction, range) in &self.entries {
            let list = range
                .indices()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "const FRAMES_{}: Array[int] = [{list}]",
                direction.const_name()
            );
        }
        out
    }

    /// Render as JSON, directions listed in sheet order:
    /// `{"cols":6,"rows":6,"tile":256,"directions":[{"direction":"up","start":4,"end":8},..]}`.
    pub fn to_json(&self) -> SheetResult<String> {
        let directions: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|(direction, range)| {
                serde_json::json!({
                    "direction": direction.as_str(),
                    "start": range.start,
                    "end": range.end,
                })
            })
            .collect();
        let doc = serde_json::json!({
            "cols": self.grid.cols,
            "rows": self.grid.rows,
            "tile": self.tile_size,
            "directions": directions,
        });
        let mut s = serde_json::to_string_pretty(&doc)
            .map_err(|e| SheetError::output(format!("serialize index table: {e}")))?;
        s.push('\n');
        Ok(s)
    }
}

/// Verify that `table` partitions `[0, total)` exactly as `layout` places frames.
pub fn check_lockstep(layout: &SheetLayout, table: &DirectionIndexTable) -> SheetResult<()> {
    if table.entries.len() != layout.runs().len() {
        return Err(SheetError::config(format!(
            "index table has {} directions but the layout has {}",
            table.entries.len(),
            layout.runs().len()
        )));
    }
    if table.grid != layout.grid() || table.tile_size != layout.tile_size() {
        return Err(SheetError::config(
            "index table grid shape differs from the layout",
        ));
    }

    let mut expected_start = 0usize;
    for ((direction, range), run) in table.entries.iter().zip(layout.runs()) {
        if *direction != run.direction {
            return Err(SheetError::config(format!(
                "index table lists '{direction}' where the layout places '{}'",
                run.direction
            )));
        }
        if range.start != expected_start || range.len() != run.frames.len() {
            return Err(SheetError::config(format!(
                "index range for '{direction}' is [{}, {}) but the layout places it at [{expected_start}, {})",
                range.start,
                range.end,
                expected_start + run.frames.len()
            )));
        }
        expected_start = range.end;
    }
    if expected_start != layout.total_frames() {
        return Err(SheetError::config(
            "index table does not cover every frame of the layout",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/index.rs"]
mod tests;
