use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{SheetError, SheetResult};

/// Semantic gaze state a run of frames is grouped under.
///
/// The eight compass directions plus the resting `center` pose and a `blink` cycle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Looking up and to the left.
    UpLeft,
    /// Looking up.
    Up,
    /// Looking up and to the right.
    UpRight,
    /// Looking left.
    Left,
    /// Resting, looking straight ahead.
    Center,
    /// Looking right.
    Right,
    /// Looking down and to the left.
    DownLeft,
    /// Looking down.
    Down,
    /// Looking down and to the right.
    DownRight,
    /// Eyelid closing and reopening.
    Blink,
}

impl Direction {
    /// Every label, in reading order of a 3x3 gaze grid followed by `blink`.
    pub const ALL: [Direction; 10] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Center,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
        Direction::Blink,
    ];

    /// Lowercase snake_case label as used in project files (`"up_left"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::UpLeft => "up_left",
            Direction::Up => "up",
            Direction::UpRight => "up_right",
            Direction::Left => "left",
            Direction::Center => "center",
            Direction::Right => "right",
            Direction::DownLeft => "down_left",
            Direction::Down => "down",
            Direction::DownRight => "down_right",
            Direction::Blink => "blink",
        }
    }

    /// Uppercase label used for emitted engine constants (`"UP_LEFT"`).
    pub fn const_name(self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SheetError;

    fn from_str(s: &str) -> SheetResult<Self> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| SheetError::config(format!("unknown direction label '{s}'")))
    }
}

/// One still source image: a frame collection plus a frame number inside it.
///
/// Serialized as a two-element array, `["vid1", 12]`.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "(String, u32)", into = "(String, u32)")]
pub struct FrameRef {
    /// Name of the source collection declared in the project file.
    pub source: String,
    /// Frame number inside the collection.
    pub frame: u32,
}

impl FrameRef {
    /// Build a reference to `frame` in collection `source`.
    pub fn new(source: impl Into<String>, frame: u32) -> Self {
        Self {
            source: source.into(),
            frame,
        }
    }
}

impl From<(String, u32)> for FrameRef {
    fn from((source, frame): (String, u32)) -> Self {
        Self { source, frame }
    }
}

impl From<FrameRef> for (String, u32) {
    fn from(r: FrameRef) -> Self {
        (r.source, r.frame)
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.source, self.frame)
    }
}

/// Output grid shape in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridShape {
    /// Cells per row.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
}

impl GridShape {
    /// Number of cells in the grid.
    pub fn capacity(self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

/// Half-open flattened index range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndexRange {
    /// Inclusive start.
    pub start: usize,
    /// Exclusive end.
    pub end: usize,
}

impl IndexRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: usize, end: usize) -> SheetResult<Self> {
        if start > end {
            return Err(SheetError::config("IndexRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of indices in the range.
    pub fn len(self) -> usize {
        self.end - self.start
    }

    /// Return `true` when the range holds no index.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Return `true` when `i` is inside `[start, end)`.
    pub fn contains(self, i: usize) -> bool {
        self.start <= i && i < self.end
    }

    /// Iterate the indices in ascending order.
    pub fn indices(self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
