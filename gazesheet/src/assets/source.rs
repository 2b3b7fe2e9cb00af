use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;

use crate::{
    assets::decode::decode_image,
    foundation::core::FrameRef,
    foundation::error::{SheetError, SheetResult},
};

/// File-name pattern of a frame collection, e.g. `frame_{n:03}.png`.
///
/// Exactly one placeholder is allowed: `{n}` for the bare frame number or `{n:0W}` for a number
/// zero-padded to `W` digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePattern {
    prefix: String,
    width: usize,
    suffix: String,
}

impl FramePattern {
    /// Pattern used when a source does not declare one.
    pub const DEFAULT: &'static str = "frame_{n:03}.png";

    /// Parse a pattern string.
    pub fn parse(pattern: &str) -> SheetResult<Self> {
        let bad = |why: &str| SheetError::config(format!("frame pattern '{pattern}': {why}"));

        let open = pattern.find('{').ok_or_else(|| bad("missing '{n}' placeholder"))?;
        let close = pattern[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| bad("unterminated placeholder"))?;
        let prefix = &pattern[..open];
        let inner = &pattern[open + 1..close];
        let suffix = &pattern[close + 1..];
        if suffix.contains(['{', '}']) || prefix.contains('}') {
            return Err(bad("only one placeholder is allowed"));
        }
        if suffix.contains(['/', '\\']) || prefix.contains(['/', '\\']) {
            return Err(bad("pattern must be a bare file name"));
        }

        let width = match inner {
            "n" => 0,
            _ => {
                let spec = inner
                    .strip_prefix("n:0")
                    .ok_or_else(|| bad("placeholder must be '{n}' or '{n:0W}'"))?;
                let width: usize = spec
                    .parse()
                    .map_err(|_| bad("zero-pad width must be a number"))?;
                if width == 0 || width > 10 {
                    return Err(bad("zero-pad width must be in 1..=10"));
                }
                width
            }
        };

        Ok(Self {
            prefix: prefix.to_string(),
            width,
            suffix: suffix.to_string(),
        })
    }

    /// File name of frame `n`.
    pub fn file_name(&self, n: u32) -> String {
        format!("{}{:0width$}{}", self.prefix, n, self.suffix, width = self.width)
    }

    /// Recover the frame number from a file name produced by this pattern.
    pub fn frame_number(&self, file_name: &str) -> Option<u32> {
        let digits = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u32 = digits.parse().ok()?;
        // Only the exact spelling `file_name(n)` counts as frame n.
        (self.file_name(n) == file_name).then_some(n)
    }
}

impl Default for FramePattern {
    fn default() -> Self {
        Self {
            prefix: "frame_".to_string(),
            width: 3,
            suffix: ".png".to_string(),
        }
    }
}

/// A resolved frame collection: directory plus naming pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDir {
    /// Directory holding the collection's frames.
    pub dir: PathBuf,
    /// File-name pattern for frame numbers.
    pub pattern: FramePattern,
}

/// Per-collection file count reported by [`FrameSource::survey`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSurvey {
    /// Collection name.
    pub name: String,
    /// Directory that was scanned.
    pub dir: PathBuf,
    /// `false` when the directory does not exist.
    pub exists: bool,
    /// Frame numbers found, ascending.
    pub frames: Vec<u32>,
}

/// Resolves [`FrameRef`]s to files and loads them as straight-alpha RGBA8.
#[derive(Clone, Debug, Default)]
pub struct FrameSource {
    dirs: BTreeMap<String, SourceDir>,
}

impl FrameSource {
    /// Build a resolver over the given collections.
    pub fn new(dirs: BTreeMap<String, SourceDir>) -> Self {
        Self { dirs }
    }

    /// Return the collection named `name`, if declared.
    pub fn dir(&self, name: &str) -> Option<&SourceDir> {
        self.dirs.get(name)
    }

    /// Path the frame is expected at.
    pub fn path_for(&self, frame: &FrameRef) -> SheetResult<PathBuf> {
        let src = self.dirs.get(&frame.source).ok_or_else(|| {
            SheetError::config(format!("unknown frame source '{}'", frame.source))
        })?;
        Ok(src.dir.join(src.pattern.file_name(frame.frame)))
    }

    /// Load the frame's pixels.
    ///
    /// Returns [`SheetError::MissingSource`] when the file is absent and [`SheetError::Decode`]
    /// when it exists but is not a decodable image.
    pub fn load(&self, frame: &FrameRef) -> SheetResult<RgbaImage> {
        let path = self.path_for(frame)?;
        if !path.is_file() {
            return Err(SheetError::missing_source(format!(
                "{frame} (expected at '{}')",
                path.display()
            )));
        }
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read frame bytes from '{}'", path.display()))?;
        decode_image(&bytes)
            .map_err(|e| SheetError::decode(format!("{frame} at '{}': {e}", path.display())))
    }

    /// Count frames present on disk per collection, in collection-name order.
    pub fn survey(&self) -> SheetResult<Vec<SourceSurvey>> {
        let mut out = Vec::with_capacity(self.dirs.len());
        for (name, src) in &self.dirs {
            out.push(survey_dir(name, src)?);
        }
        Ok(out)
    }
}

fn survey_dir(name: &str, src: &SourceDir) -> SheetResult<SourceSurvey> {
    if !src.dir.is_dir() {
        return Ok(SourceSurvey {
            name: name.to_string(),
            dir: src.dir.clone(),
            exists: false,
            frames: Vec::new(),
        });
    }

    let rd = std::fs::read_dir(&src.dir)
        .with_context(|| format!("list frame directory '{}'", src.dir.display()))?;
    let mut frames = Vec::new();
    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(n) = src.pattern.frame_number(file_name) {
            frames.push(n);
        }
    }
    frames.sort_unstable();
    frames.dedup();

    Ok(SourceSurvey {
        name: name.to_string(),
        dir: src.dir.clone(),
        exists: true,
        frames,
    })
}

/// Resolve a project-relative path against `root`; absolute paths are returned unchanged.
pub fn resolve_path(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
