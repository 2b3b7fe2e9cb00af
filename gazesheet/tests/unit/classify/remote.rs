use image::Rgba;

use super::*;

struct Failing;

impl SegmentationService for Failing {
    fn segment(&self, _png: &[u8]) -> SheetResult<Vec<u8>> {
        Err(SheetError::classification("service unavailable"))
    }
}

struct Garbage;

impl SegmentationService for Garbage {
    fn segment(&self, _png: &[u8]) -> SheetResult<Vec<u8>> {
        Ok(b"<html>rate limited</html>".to_vec())
    }
}

/// Pretends to segment by clearing alpha on the left half.
struct LeftHalfCutout;

impl SegmentationService for LeftHalfCutout {
    fn segment(&self, png: &[u8]) -> SheetResult<Vec<u8>> {
        let mut img = decode_image(png)?;
        let w = img.width();
        for (x, _, px) in img.enumerate_pixels_mut() {
            if x < w / 2 {
                px.0[3] = 0;
            }
        }
        encode_png(&img)
    }
}

fn sample_frame() -> RgbaImage {
    RgbaImage::from_fn(4, 2, |x, _| {
        if x % 2 == 0 {
            Rgba([235, 230, 228, 255])
        } else {
            Rgba([190, 70, 20, 255])
        }
    })
}

#[test]
fn service_result_is_used_verbatim() {
    let c = RemoteClassifier::new(Box::new(LeftHalfCutout), LumaKeyClassifier::default());
    let out = c.classify(&sample_frame());
    assert!(out.fallback.is_none());
    assert_eq!(out.image.get_pixel(0, 0).0[3], 0);
    assert_eq!(out.image.get_pixel(1, 0).0[3], 0);
    // right half kept opaque even where the luma key would have cleared it
    assert_eq!(out.image.get_pixel(2, 0).0[3], 255);
}

#[test]
fn failing_service_matches_local_heuristic_exactly() {
    let local = LumaKeyClassifier::default();
    let c = RemoteClassifier::new(Box::new(Failing), local);
    let frame = sample_frame();

    let out = c.classify(&frame);
    assert_eq!(out.image, local.classify(&frame).image);
    let reason = out.fallback.unwrap();
    assert!(reason.contains("service unavailable"));
}

#[test]
fn undecodable_answer_falls_back() {
    let c = RemoteClassifier::new(Box::new(Garbage), LumaKeyClassifier::default());
    let out = c.classify(&sample_frame());
    assert!(out.fallback.unwrap().contains("classification error"));
}

#[test]
fn params_validation_checks_endpoint_and_timeout() {
    assert!(RemoteParams::default().validate().is_ok());
    let p = RemoteParams {
        endpoint: "ftp://example.invalid".to_string(),
        ..RemoteParams::default()
    };
    assert!(p.validate().is_err());
    let p = RemoteParams {
        timeout_ms: 0,
        ..RemoteParams::default()
    };
    assert!(p.validate().is_err());
}

#[test]
fn unreachable_endpoint_falls_back_within_timeout() {
    let params = RemoteParams {
        endpoint: "http://127.0.0.1:9/removebg".to_string(),
        timeout_ms: 500,
        ..RemoteParams::default()
    };
    let service = HttpSegmentationService::new(&params, "test-key".to_string());
    let c = RemoteClassifier::new(Box::new(service), LumaKeyClassifier::new(params.fallback));
    let out = c.classify(&sample_frame());
    assert!(out.fallback.is_some());
    assert_eq!(out.image.dimensions(), (4, 2));
}

#[test]
fn cache_key_tracks_fallback_thresholds() {
    let loose = RemoteClassifier::new(Box::new(Failing), LumaKeyClassifier::default());
    let strict = RemoteClassifier::new(
        Box::new(Failing),
        LumaKeyClassifier::new(LumaKeyParams {
            sat_threshold: 10.0,
            ..LumaKeyParams::default()
        }),
    );
    assert!(loose.cache_key().starts_with("remote:"));
    assert_ne!(loose.cache_key(), strict.cache_key());
}
