use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Resample `img` to exactly `tile x tile`.
///
/// Resampling works on straight (non-premultiplied) RGBA with a Lanczos3 kernel. Run this after
/// background classification so smoothed edge colors are never classified as foreground.
pub fn normalize_tile(img: &RgbaImage, tile: u32) -> RgbaImage {
    if img.dimensions() == (tile, tile) {
        return img.clone();
    }
    imageops::resize(img, tile, tile, FilterType::Lanczos3)
}

#[cfg(test)]
#[path = "../../tests/unit/render/normalize.rs"]
mod tests;
