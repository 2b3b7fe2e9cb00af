use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::source::{FramePattern, FrameSource, SourceDir, resolve_path};
use crate::classify::ClassifierConfig;
use crate::config::validate::validate_sheet;
use crate::foundation::core::{Direction, FrameRef, GridShape};
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::grid::{DirectionRun, SheetLayout};

/// A frame collection as written in the project file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDef {
    /// Directory of the collection, relative to the project file unless absolute.
    pub dir: PathBuf,
    /// File-name pattern, see [`FramePattern`].
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    FramePattern::DEFAULT.to_string()
}

/// Grid shape as written in the project file; `rows` defaults to the fewest rows that fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridDef {
    /// Cells per row.
    pub cols: u32,
    /// Row count; derived from the frame count when omitted.
    #[serde(default)]
    pub rows: Option<u32>,
}

/// Format of the emitted index table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexFormat {
    /// Engine script constants.
    #[default]
    Gdscript,
    /// JSON document.
    Json,
}

/// Output locations of a sheet.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputDef {
    /// PNG sheet path.
    pub sheet: PathBuf,
    /// Index table path; printed only when omitted.
    #[serde(default)]
    pub index: Option<PathBuf>,
    /// Index table format.
    #[serde(default)]
    pub index_format: IndexFormat,
    /// Prefix of the grid constants in script output (`EYE_COLS`).
    #[serde(default = "default_const_prefix")]
    pub const_prefix: String,
    /// Directory receiving each processed tile as its own PNG.
    #[serde(default)]
    pub frames_dir: Option<PathBuf>,
}

fn default_const_prefix() -> String {
    "EYE".to_string()
}

/// One named sheet as written in the project file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetDef {
    /// Square tile edge in pixels.
    pub tile_size: u32,
    /// Grid shape.
    pub grid: GridDef,
    /// Direction order; determines flattened indices.
    pub order: Vec<Direction>,
    /// Frames per direction.
    pub sequences: BTreeMap<Direction, Vec<FrameRef>>,
    /// Background classifier.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Output locations.
    pub output: OutputDef,
}

/// Top-level project file contents.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDef {
    /// Frame collections by name.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceDef>,
    /// Sheets by name.
    #[serde(default)]
    pub sheets: BTreeMap<String, SheetDef>,
}

/// Resolved output locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetOutput {
    /// PNG sheet path.
    pub sheet: PathBuf,
    /// Index table path.
    pub index: Option<PathBuf>,
    /// Index table format.
    pub index_format: IndexFormat,
    /// Prefix of grid constants in script output.
    pub const_prefix: String,
    /// Per-tile dump directory.
    pub frames_dir: Option<PathBuf>,
}

/// A validated sheet with every path resolved: the single argument a build needs.
#[derive(Clone, Debug)]
pub struct SheetSpec {
    /// Sheet name from the project file.
    pub name: String,
    /// Layout shared by compositor and index emitter.
    pub layout: SheetLayout,
    /// Frame resolver over the project's collections.
    pub source: FrameSource,
    /// Classifier selection.
    pub classifier: ClassifierConfig,
    /// Output locations.
    pub output: SheetOutput,
}

/// Project file loaded from disk, with the directory relative paths resolve against.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    def: ProjectDef,
    root: PathBuf,
}

impl ProjectConfig {
    /// Parse a project from a JSON reader; relative paths resolve against `root`.
    pub fn from_reader<R: std::io::Read>(r: R, root: impl Into<PathBuf>) -> SheetResult<Self> {
        let def: ProjectDef = serde_json::from_reader(r)
            .map_err(|e| SheetError::config(format!("parse project JSON: {e}")))?;
        Ok(Self {
            def,
            root: root.into(),
        })
    }

    /// Parse a project file; relative paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SheetError::config(format!("open project JSON '{}': {e}", path.display()))
        })?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_reader(BufReader::new(f), root)
    }

    /// Wrap an in-memory definition.
    pub fn from_def(def: ProjectDef, root: impl Into<PathBuf>) -> Self {
        Self {
            def,
            root: root.into(),
        }
    }

    /// Raw definition.
    pub fn def(&self) -> &ProjectDef {
        &self.def
    }

    /// Directory relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sheet names in sorted order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.def.sheets.keys().map(String::as_str).collect()
    }

    /// Resolver over every declared collection.
    pub fn frame_source(&self) -> SheetResult<FrameSource> {
        let mut dirs = BTreeMap::new();
        for (name, src) in &self.def.sources {
            let pattern = FramePattern::parse(&src.pattern)?;
            dirs.insert(
                name.clone(),
                SourceDir {
                    dir: resolve_path(&self.root, &src.dir),
                    pattern,
                },
            );
        }
        Ok(FrameSource::new(dirs))
    }

    /// Select, resolve and validate the sheet called `name`.
    pub fn sheet(&self, name: &str) -> SheetResult<SheetSpec> {
        let def = self.def.sheets.get(name).ok_or_else(|| {
            let known = self.sheet_names().join(", ");
            SheetError::config(format!("no sheet named '{name}' (known: {known})"))
        })?;
        validate_sheet(name, def, &self.def.sources)?;

        let source = self.frame_source()?;
        let runs: Vec<DirectionRun> = def
            .order
            .iter()
            .map(|d| DirectionRun {
                direction: *d,
                frames: def.sequences.get(d).cloned().unwrap_or_default(),
            })
            .collect();
        let total: usize = runs.iter().map(|r| r.frames.len()).sum();
        let grid = GridShape {
            cols: def.grid.cols,
            rows: def.grid.rows.unwrap_or_else(|| derived_rows(total, def.grid.cols)),
        };
        let layout = SheetLayout::new(def.tile_size, grid, runs)?;

        let out = &def.output;
        let output = SheetOutput {
            sheet: resolve_path(&self.root, &out.sheet),
            index: out.index.as_deref().map(|p| resolve_path(&self.root, p)),
            index_format: out.index_format,
            const_prefix: out.const_prefix.clone(),
            frames_dir: out.frames_dir.as_deref().map(|p| resolve_path(&self.root, p)),
        };

        Ok(SheetSpec {
            name: name.to_string(),
            layout,
            source,
            classifier: def.classifier.clone(),
            output,
        })
    }
}

fn derived_rows(total: usize, cols: u32) -> u32 {
    if cols == 0 {
        return 0;
    }
    total.div_ceil(cols as usize).max(1) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
