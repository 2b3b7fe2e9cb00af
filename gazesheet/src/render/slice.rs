use image::{GenericImageView, RgbaImage};

use crate::foundation::core::Direction;
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::grid::SheetLayout;

/// One tile cut back out of a built sheet.
#[derive(Clone, Debug)]
pub struct SlicedTile {
    /// Flattened index.
    pub index: usize,
    /// Direction the tile belongs to.
    pub direction: Direction,
    /// Position inside the direction run.
    pub step: usize,
    /// Tile pixels.
    pub image: RgbaImage,
}

impl SlicedTile {
    /// File name used when writing the tile: `<direction>_<step:02>.png`.
    pub fn file_name(&self) -> String {
        format!("{}_{:02}.png", self.direction, self.step)
    }
}

/// Cut `sheet` into one tile per flattened index of `layout`.
pub fn slice_sheet(sheet: &RgbaImage, layout: &SheetLayout) -> SheetResult<Vec<SlicedTile>> {
    if sheet.dimensions() != layout.canvas_size() {
        let (w, h) = layout.canvas_size();
        return Err(SheetError::config(format!(
            "sheet is {}x{} but the layout expects {w}x{h}",
            sheet.width(),
            sheet.height()
        )));
    }

    let tile = layout.tile_size();
    Ok(layout
        .slots()
        .map(|slot| {
            let (x, y) = layout.offset(slot.index);
            SlicedTile {
                index: slot.index,
                direction: slot.direction,
                step: slot.step,
                image: sheet.view(x, y, tile, tile).to_image(),
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/render/slice.rs"]
mod tests;
