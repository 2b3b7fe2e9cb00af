use image::RgbaImage;

use crate::classify::{BackgroundClassifier, Classified};
use crate::foundation::error::{SheetError, SheetResult};

/// Settings for removing a baked-in grey checkerboard backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckerKeyParams {
    /// Per-channel distance under which a pixel matches a checker color.
    pub tolerance: u8,
    /// Side of the top-left square sampled for checker colors.
    pub sample: u32,
}

impl Default for CheckerKeyParams {
    fn default() -> Self {
        Self {
            tolerance: 25,
            sample: 5,
        }
    }
}

impl CheckerKeyParams {
    pub(crate) fn validate(&self) -> SheetResult<()> {
        if self.sample == 0 {
            return Err(SheetError::config("checker_key sample must be > 0"));
        }
        if self.tolerance == 0 {
            return Err(SheetError::config("checker_key tolerance must be > 0"));
        }
        Ok(())
    }
}

/// Clears pixels matching the (up to two) grey checker colors found in the top-left corner.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckerKeyClassifier {
    params: CheckerKeyParams,
}

impl CheckerKeyClassifier {
    /// Build a classifier with the given settings.
    pub fn new(params: CheckerKeyParams) -> Self {
        Self { params }
    }

    /// Sample the corner for the two alternating grey checker colors.
    pub fn detect_colors(&self, img: &RgbaImage) -> Vec<[u8; 3]> {
        let (w, h) = img.dimensions();
        let side_x = self.params.sample.min(w);
        let side_y = self.params.sample.min(h);

        let mut colors: Vec<[u8; 3]> = Vec::with_capacity(2);
        'scan: for y in 0..side_y {
            for x in 0..side_x {
                let [r, g, b, _] = img.get_pixel(x, y).0;
                if !is_grey(r, g, b) {
                    continue;
                }
                match colors.first().copied() {
                    None => colors.push([r, g, b]),
                    Some(first) if r.abs_diff(first[0]) > 20 => {
                        colors.push([r, g, b]);
                        break 'scan;
                    }
                    Some(_) => {}
                }
            }
        }
        colors
    }
}

fn is_grey(r: u8, g: u8, b: u8) -> bool {
    r.abs_diff(g) < 10 && g.abs_diff(b) < 10
}

impl BackgroundClassifier for CheckerKeyClassifier {
    fn name(&self) -> &'static str {
        "checker_key"
    }

    fn cache_key(&self) -> String {
        format!("checker_key:{:?}", self.params)
    }

    fn classify(&self, img: &RgbaImage) -> Classified {
        let colors = self.detect_colors(img);
        let mut out = img.clone();
        if colors.is_empty() {
            tracing::debug!("no grey checker colors in corner sample; frame left untouched");
            return Classified::direct(out);
        }

        let tol = self.params.tolerance;
        for px in out.pixels_mut() {
            let [r, g, b, _] = px.0;
            let hit = colors.iter().any(|c| {
                r.abs_diff(c[0]) < tol && g.abs_diff(c[1]) < tol && b.abs_diff(c[2]) < tol
            });
            if hit {
                px.0[3] = 0;
            }
        }
        Classified::direct(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/classify/checker_key.rs"]
mod tests;
