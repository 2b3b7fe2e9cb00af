use image::{RgbaImage, imageops};

use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::grid::SheetLayout;

/// Place tiles into a transparent canvas at their flattened-index cells.
///
/// `tiles[i]` is the processed frame for flattened index `i`; `None` leaves the cell transparent
/// without shifting any later index. Each tile replaces the destination inside its own cell, so
/// nothing is blended across cells.
pub fn composite_sheet(
    layout: &SheetLayout,
    tiles: &[Option<&RgbaImage>],
) -> SheetResult<RgbaImage> {
    if tiles.len() != layout.total_frames() {
        return Err(SheetError::config(format!(
            "compositor got {} tiles for a layout of {} frames",
            tiles.len(),
            layout.total_frames()
        )));
    }

    let (w, h) = layout.canvas_size();
    let tile = layout.tile_size();
    let mut canvas = RgbaImage::new(w, h);

    for (i, slot) in tiles.iter().enumerate() {
        let Some(img) = slot else {
            continue;
        };
        if img.dimensions() != (tile, tile) {
            return Err(SheetError::config(format!(
                "tile {i} is {}x{} but the sheet expects {tile}x{tile}",
                img.width(),
                img.height()
            )));
        }
        let (x, y) = layout.offset(i);
        imageops::replace(&mut canvas, *img, i64::from(x), i64::from(y));
    }

    Ok(canvas)
}

/// Return `true` when every pixel of the cell at flattened index `i` is fully transparent.
pub fn cell_is_transparent(sheet: &RgbaImage, layout: &SheetLayout, i: usize) -> bool {
    let (x0, y0) = layout.offset(i);
    let tile = layout.tile_size();
    (y0..y0 + tile).all(|y| (x0..x0 + tile).all(|x| sheet.get_pixel(x, y).0[3] == 0))
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
