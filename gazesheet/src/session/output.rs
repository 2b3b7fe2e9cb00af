use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::config::model::{IndexFormat, SheetOutput, SheetSpec};
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::index::DirectionIndexTable;
use crate::render::slice::slice_sheet;
use crate::session::build::SheetBuild;

/// Files written by [`write_outputs`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrittenOutputs {
    /// Sheet PNG.
    pub sheet: PathBuf,
    /// Index table, when configured.
    pub index: Option<PathBuf>,
    /// Per-tile PNGs, in flattened-index order.
    pub frames: Vec<PathBuf>,
}

/// Render the index table in the sheet's configured format.
pub fn render_index(index: &DirectionIndexTable, output: &SheetOutput) -> SheetResult<String> {
    match output.index_format {
        IndexFormat::Gdscript => Ok(index.to_gdscript(&output.const_prefix)),
        IndexFormat::Json => index.to_json(),
    }
}

/// Write the sheet PNG, the index table and the optional per-tile dump.
///
/// Parent directories are created as needed. Tiles are named `<index:02>_<direction>.png`.
pub fn write_outputs(build: &SheetBuild, spec: &SheetSpec) -> SheetResult<WrittenOutputs> {
    let out = &spec.output;
    save_png(&build.sheet, &out.sheet)?;

    let index = match &out.index {
        Some(path) => {
            ensure_parent_dir(path)?;
            let text = render_index(&build.index, out)?;
            std::fs::write(path, text).map_err(|e| {
                SheetError::output(format!("write index '{}': {e}", path.display()))
            })?;
            Some(path.clone())
        }
        None => None,
    };

    let mut frames = Vec::new();
    if let Some(dir) = &out.frames_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            SheetError::output(format!("create frames dir '{}': {e}", dir.display()))
        })?;
        for tile in slice_sheet(&build.sheet, &spec.layout)? {
            let path = dir.join(format!("{:02}_{}.png", tile.index, tile.direction));
            save_png(&tile.image, &path)?;
            frames.push(path);
        }
    }

    tracing::info!(
        sheet = %out.sheet.display(),
        index = index.is_some(),
        frames = frames.len(),
        "outputs written"
    );
    Ok(WrittenOutputs {
        sheet: out.sheet.clone(),
        index,
        frames,
    })
}

/// Save `img` as PNG at `path`, creating parent directories.
pub fn save_png(img: &RgbaImage, path: &Path) -> SheetResult<()> {
    ensure_parent_dir(path)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| SheetError::output(format!("write png '{}': {e}", path.display())))
}

fn ensure_parent_dir(path: &Path) -> SheetResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            SheetError::output(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/session/output.rs"]
mod tests;
