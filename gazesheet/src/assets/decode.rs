use std::io::Cursor;

use image::RgbaImage;

use crate::foundation::error::{SheetError, SheetResult};

/// Decode any supported encoded image into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> SheetResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SheetError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Encode straight-alpha RGBA8 as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> SheetResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| SheetError::output(format!("encode png: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
