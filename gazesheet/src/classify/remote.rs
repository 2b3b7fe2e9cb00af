use std::io::Read;
use std::time::Duration;

use base64::Engine as _;
use image::RgbaImage;

use crate::assets::decode::{decode_image, encode_png};
use crate::classify::{BackgroundClassifier, Classified, LumaKeyClassifier, LumaKeyParams};
use crate::foundation::error::{SheetError, SheetResult};

/// Default remove.bg-compatible endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.remove.bg/v1.0/removebg";

const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Settings for the remote segmentation service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RemoteParams {
    /// POST endpoint accepting a base64 image and returning an image with alpha.
    pub endpoint: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Requested output size hint forwarded to the service.
    pub size: String,
    /// Local heuristic used whenever the service cannot produce a result.
    pub fallback: LumaKeyParams,
}

impl Default for RemoteParams {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: "REMOVE_BG_API_KEY".to_string(),
            timeout_ms: 30_000,
            size: "auto".to_string(),
            fallback: LumaKeyParams::default(),
        }
    }
}

impl RemoteParams {
    pub(crate) fn validate(&self) -> SheetResult<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(SheetError::config(format!(
                "remote endpoint '{}' must be an http(s) URL",
                self.endpoint
            )));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(SheetError::config("remote api_key_env must be non-empty"));
        }
        if self.timeout_ms == 0 {
            return Err(SheetError::config("remote timeout_ms must be > 0"));
        }
        self.fallback.validate()
    }
}

/// Transport seam for remote background removal.
pub trait SegmentationService: Send + Sync {
    /// Send encoded PNG bytes and return the encoded image the service answered with.
    fn segment(&self, png: &[u8]) -> SheetResult<Vec<u8>>;

    /// Settings that change what the service answers with.
    fn cache_key(&self) -> String {
        String::new()
    }
}

/// Blocking HTTP client for remove.bg-style APIs.
pub struct HttpSegmentationService {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    size: String,
}

impl HttpSegmentationService {
    /// Build a client with the timeout and endpoint from `params`.
    pub fn new(params: &RemoteParams, api_key: String) -> Self {
        let timeout = Duration::from_millis(params.timeout_ms);
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build();
        Self {
            agent,
            endpoint: params.endpoint.clone(),
            api_key,
            size: params.size.clone(),
        }
    }
}

impl SegmentationService for HttpSegmentationService {
    fn cache_key(&self) -> String {
        format!("{} size={}", self.endpoint, self.size)
    }

    fn segment(&self, png: &[u8]) -> SheetResult<Vec<u8>> {
        let body = serde_json::json!({
            "image_file_b64": base64::engine::general_purpose::STANDARD.encode(png),
            "size": self.size,
            "format": "png",
        });
        let body = serde_json::to_string(&body)
            .map_err(|e| SheetError::classification(format!("serialize request: {e}")))?;

        let resp = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .set("Accept", "image/png")
            .set("X-Api-Key", &self.api_key)
            .send_string(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => {
                    let detail = resp.into_string().unwrap_or_default();
                    let detail: String = detail.chars().take(100).collect();
                    SheetError::classification(format!("service returned HTTP {code}: {detail}"))
                }
                ureq::Error::Transport(t) => {
                    SheetError::classification(format!("request failed: {t}"))
                }
            })?;

        let mut bytes = Vec::new();
        resp.into_reader()
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| SheetError::classification(format!("read response body: {e}")))?;
        if bytes.is_empty() {
            return Err(SheetError::classification("service returned an empty body"));
        }
        Ok(bytes)
    }
}

/// Delegates to a [`SegmentationService`] and falls back to a local luma key on any failure.
pub struct RemoteClassifier {
    service: Box<dyn SegmentationService>,
    fallback: LumaKeyClassifier,
}

impl RemoteClassifier {
    /// Build a classifier over `service` with `fallback` for failures.
    pub fn new(service: Box<dyn SegmentationService>, fallback: LumaKeyClassifier) -> Self {
        Self { service, fallback }
    }

    fn try_remote(&self, img: &RgbaImage) -> SheetResult<RgbaImage> {
        let png = encode_png(img)?;
        let answer = self.service.segment(&png)?;
        let out = decode_image(&answer)
            .map_err(|e| SheetError::classification(format!("service response: {e}")))?;
        if out.width() == 0 || out.height() == 0 {
            return Err(SheetError::classification("service returned an empty image"));
        }
        Ok(out)
    }
}

impl BackgroundClassifier for RemoteClassifier {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn cache_key(&self) -> String {
        format!(
            "remote:{}|{}",
            self.service.cache_key(),
            self.fallback.cache_key()
        )
    }

    fn classify(&self, img: &RgbaImage) -> Classified {
        match self.try_remote(img) {
            Ok(image) => Classified::direct(image),
            Err(e) => {
                tracing::debug!(error = %e, "remote classification failed; using local luma key");
                Classified {
                    image: self.fallback.apply(img),
                    fallback: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/classify/remote.rs"]
mod tests;
