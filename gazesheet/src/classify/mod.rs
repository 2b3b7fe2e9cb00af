//! Background classification.
//!
//! Every classifier maps a decoded frame to a same-sized frame whose alpha channel marks the
//! studio backdrop as transparent. Classification never fails: remote failures fall back to the
//! local heuristic and are reported through [`Classified::fallback`].

/// Baked-in checkerboard backdrop removal.
pub(crate) mod checker_key;
/// Brightness/saturation thresholding heuristic.
pub(crate) mod luma_key;
/// Remote segmentation service with local fallback.
pub(crate) mod remote;

use image::RgbaImage;

use crate::foundation::error::{SheetError, SheetResult};

pub use checker_key::{CheckerKeyClassifier, CheckerKeyParams};
pub use luma_key::{LumaKeyClassifier, LumaKeyParams};
pub use remote::{
    HttpSegmentationService, RemoteClassifier, RemoteParams, SegmentationService,
};

/// Result of classifying one frame.
#[derive(Clone, Debug)]
pub struct Classified {
    /// Same image with backdrop pixels made transparent.
    pub image: RgbaImage,
    /// Set when the preferred path failed and a fallback produced `image`.
    pub fallback: Option<String>,
}

impl Classified {
    /// Wrap a result produced by the preferred path.
    pub fn direct(image: RgbaImage) -> Self {
        Self {
            image,
            fallback: None,
        }
    }
}

/// Per-pixel opacity decision for a whole frame.
///
/// Implementations must be pure with respect to the input image (the remote variant aside) and
/// must not panic or fail; callers are agnostic of which variant they hold.
pub trait BackgroundClassifier: Send + Sync {
    /// Short stable name used in logs.
    fn name(&self) -> &'static str;

    /// Identity of this classifier and its settings. Two classifiers with the same key must
    /// produce the same output for the same frame.
    fn cache_key(&self) -> String {
        self.name().to_string()
    }

    /// Classify `img`, returning a same-sized image with alpha applied.
    fn classify(&self, img: &RgbaImage) -> Classified;
}

/// Classifier selection as written in a project file (`"kind"` tagged).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierConfig {
    /// Local brightness/saturation heuristic.
    LumaKey(LumaKeyParams),
    /// Local checkerboard backdrop removal.
    CheckerKey(CheckerKeyParams),
    /// Remote segmentation service, falling back to the luma key.
    Remote(RemoteParams),
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::LumaKey(LumaKeyParams::default())
    }
}

impl ClassifierConfig {
    /// Stable kind label, matching the serialized `"kind"` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LumaKey(_) => "luma_key",
            Self::CheckerKey(_) => "checker_key",
            Self::Remote(_) => "remote",
        }
    }

    /// Switch to another classifier kind, keeping parameters when the kind is unchanged.
    ///
    /// Luma key thresholds carry over between `luma_key` and the fallback of `remote`.
    pub fn with_kind(self, kind: &str) -> SheetResult<Self> {
        if kind == self.kind() {
            return Ok(self);
        }
        match (kind, self) {
            ("luma_key", Self::Remote(p)) => Ok(Self::LumaKey(p.fallback)),
            ("luma_key", _) => Ok(Self::LumaKey(LumaKeyParams::default())),
            ("checker_key", _) => Ok(Self::CheckerKey(CheckerKeyParams::default())),
            ("remote", Self::LumaKey(fallback)) => Ok(Self::Remote(RemoteParams {
                fallback,
                ..RemoteParams::default()
            })),
            ("remote", _) => Ok(Self::Remote(RemoteParams::default())),
            (other, _) => Err(SheetError::config(format!(
                "unknown classifier kind '{other}'"
            ))),
        }
    }

    /// Check thresholds and service settings.
    pub fn validate(&self) -> SheetResult<()> {
        match self {
            Self::LumaKey(p) => p.validate(),
            Self::CheckerKey(p) => p.validate(),
            Self::Remote(p) => p.validate(),
        }
    }

    /// Instantiate the configured classifier.
    ///
    /// A remote classifier whose API key variable is unset degrades to its local fallback.
    pub fn build(&self) -> SheetResult<Box<dyn BackgroundClassifier>> {
        self.validate()?;
        Ok(match self {
            Self::LumaKey(p) => Box::new(LumaKeyClassifier::new(*p)),
            Self::CheckerKey(p) => Box::new(CheckerKeyClassifier::new(*p)),
            Self::Remote(p) => match std::env::var(&p.api_key_env) {
                Ok(key) if !key.trim().is_empty() => {
                    let service = HttpSegmentationService::new(p, key.trim().to_string());
                    Box::new(RemoteClassifier::new(
                        Box::new(service),
                        LumaKeyClassifier::new(p.fallback),
                    ))
                }
                _ => {
                    tracing::warn!(
                        env = %p.api_key_env,
                        "remote classifier API key not set; using local luma key for every frame"
                    );
                    Box::new(LumaKeyClassifier::new(p.fallback))
                }
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/classify/mod.rs"]
mod tests;
