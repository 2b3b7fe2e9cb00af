use image::RgbaImage;

use crate::classify::{BackgroundClassifier, Classified};
use crate::foundation::error::{SheetError, SheetResult};
use crate::foundation::math::{chroma_spread, luma};

/// Thresholds for the luma key.
///
/// A pixel is backdrop when `luma > bright_threshold` and `spread < sat_threshold`. Pixels with
/// `luma > bright_threshold - feather_bright` and `spread < sat_threshold - feather_sat` get a
/// linearly ramped partial alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LumaKeyParams {
    /// Brightness above which low-saturation pixels are backdrop.
    pub bright_threshold: f32,
    /// Saturation below which bright pixels are backdrop.
    pub sat_threshold: f32,
    /// Width of the brightness feather band below `bright_threshold`.
    pub feather_bright: f32,
    /// How much stricter the saturation test is inside the feather band.
    pub feather_sat: f32,
}

impl Default for LumaKeyParams {
    fn default() -> Self {
        Self {
            bright_threshold: 180.0,
            sat_threshold: 80.0,
            feather_bright: 30.0,
            feather_sat: 20.0,
        }
    }
}

impl LumaKeyParams {
    pub(crate) fn validate(&self) -> SheetResult<()> {
        let in_range = |v: f32| v.is_finite() && (0.0..=255.0).contains(&v);
        if !in_range(self.bright_threshold) {
            return Err(SheetError::config("luma_key bright_threshold must be in 0..=255"));
        }
        if !in_range(self.sat_threshold) {
            return Err(SheetError::config("luma_key sat_threshold must be in 0..=255"));
        }
        if !in_range(self.feather_bright) || !in_range(self.feather_sat) {
            return Err(SheetError::config(
                "luma_key feather widths must be finite and in 0..=255",
            ));
        }
        Ok(())
    }

    /// Opacity the key assigns to an opaque pixel of color `(r, g, b)`.
    pub fn key_alpha(&self, r: u8, g: u8, b: u8) -> u8 {
        let y = luma(r, g, b);
        let s = chroma_spread(r, g, b);

        if y > self.bright_threshold && s < self.sat_threshold {
            return 0;
        }

        let band_floor = self.bright_threshold - self.feather_bright;
        if self.feather_bright > 0.0
            && y > band_floor
            && s < self.sat_threshold - self.feather_sat
        {
            let t = (y - band_floor) / self.feather_bright;
            return (255.0 * (1.0 - t)).clamp(0.0, 255.0) as u8;
        }

        255
    }
}

/// Local deterministic backdrop removal over brightness and saturation.
#[derive(Clone, Copy, Debug, Default)]
pub struct LumaKeyClassifier {
    params: LumaKeyParams,
}

impl LumaKeyClassifier {
    /// Build a classifier with the given thresholds.
    pub fn new(params: LumaKeyParams) -> Self {
        Self { params }
    }

    /// Thresholds in use.
    pub fn params(&self) -> LumaKeyParams {
        self.params
    }

    /// Apply the key, keeping color channels and never raising existing alpha.
    pub fn apply(&self, img: &RgbaImage) -> RgbaImage {
        let mut out = img.clone();
        for px in out.pixels_mut() {
            let [r, g, b, a] = px.0;
            px.0[3] = a.min(self.params.key_alpha(r, g, b));
        }
        out
    }
}

impl BackgroundClassifier for LumaKeyClassifier {
    fn name(&self) -> &'static str {
        "luma_key"
    }

    fn cache_key(&self) -> String {
        format!("luma_key:{:?}", self.params)
    }

    fn classify(&self, img: &RgbaImage) -> Classified {
        Classified::direct(self.apply(img))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/classify/luma_key.rs"]
mod tests;
