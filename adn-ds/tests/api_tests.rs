//! Integration tests for adn-ds HTTP endpoints
//!
//! Tests cover:
//! - Readiness message and health endpoint
//! - Successful denoise of mono and stereo WAV uploads
//! - MP3, Ogg Vorbis and M4A uploads re-encoded as 16-bit WAV
//! - Missing `file` field and non-multipart requests (400)
//! - Corrupt uploads (422) and oversized uploads (413)
//! - Deterministic output

mod helpers;

use std::path::Path;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::audio_generator::{generate_noisy_wav, read_wav, AudioConfig};
use helpers::multipart::{self, Part};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method
use adn_ds::{build_router, AppState};

const TEST_UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

fn setup_app() -> axum::Router {
    build_router(AppState::new(TEST_UPLOAD_LIMIT))
}

async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.expect("Should read body").to_bytes().to_vec()
}

async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}

// =============================================================================
// Readiness / Health
// =============================================================================

#[tokio::test]
async fn test_root_returns_ready_message() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = setup_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Audio Denoising Backend is running!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = setup_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "adn-ds");
    assert!(body["version"].is_string());
}

// =============================================================================
// Successful denoise
// =============================================================================

#[tokio::test]
async fn test_denoise_mono_wav() {
    // 2 s, 44100 Hz, mono, synthetic noise
    let input = generate_noisy_wav(&AudioConfig::default());

    let response = setup_app()
        .oneshot(multipart::request("/denoise", &[Part::file(&input)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "audio/wav");

    let (spec, samples) = read_wav(&body_bytes(response.into_body()).await);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    // Exactly 2 s of audio
    assert_eq!(samples.len(), 88200);
}

#[tokio::test]
async fn test_denoise_stereo_wav_keeps_layout() {
    let config = AudioConfig {
        duration_seconds: 1.5,
        sample_rate: 22050,
        channels: 2,
        bits_per_sample: 24,
        ..Default::default()
    };
    let input = generate_noisy_wav(&config);

    let response = setup_app()
        .oneshot(multipart::request("/denoise", &[Part::file(&input)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let (spec, samples) = read_wav(&body_bytes(response.into_body()).await);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 24);
    assert_eq!(samples.len(), (1.5 * 22050.0) as usize * 2);
}

#[tokio::test]
async fn test_denoise_is_deterministic() {
    let input = generate_noisy_wav(&AudioConfig {
        duration_seconds: 1.0,
        lead_in_seconds: 0.5,
        ..Default::default()
    });

    let first = setup_app()
        .oneshot(multipart::request("/denoise", &[Part::file(&input)]))
        .await
        .unwrap();
    let second = setup_app()
        .oneshot(multipart::request("/denoise", &[Part::file(&input)]))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(
        body_bytes(first.into_body()).await,
        body_bytes(second.into_body()).await
    );
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let input = generate_noisy_wav(&AudioConfig {
        duration_seconds: 0.5,
        lead_in_seconds: 0.25,
        ..Default::default()
    });

    let response = setup_app()
        .oneshot(multipart::request(
            "/denoise",
            &[Part::text("note", "hello"), Part::file(&input)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Compressed uploads
// =============================================================================

fn fixture(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("Should read {}: {e}", path.display()))
}

/// POST a fixture and return the decoded WAV reply
async fn denoise_fixture(name: &str, content_type: &str) -> (hound::WavSpec, Vec<i32>) {
    let input = fixture(name);

    let response = setup_app()
        .oneshot(multipart::request(
            "/denoise",
            &[Part::upload(name, content_type, &input)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "{name}");
    assert_eq!(response.headers()["content-type"], "audio/wav");
    read_wav(&body_bytes(response.into_body()).await)
}

#[tokio::test]
async fn test_denoise_mp3_upload() {
    // MPEG-2 Layer III, 22050 Hz, mono
    let (spec, samples) = denoise_fixture("speech_mono.mp3", "audio/mpeg").await;

    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert!(!samples.is_empty());
}

#[tokio::test]
async fn test_denoise_ogg_vorbis_upload() {
    // Vorbis, 48000 Hz, stereo
    let (spec, samples) = denoise_fixture("noise_stereo.ogg", "audio/ogg").await;

    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 16);
    assert!(!samples.is_empty());
    assert_eq!(samples.len() % 2, 0);
}

#[tokio::test]
async fn test_denoise_m4a_upload() {
    // AAC-LC in MP4, 44100 Hz, mono
    let (spec, samples) = denoise_fixture("noise_mono.m4a", "audio/mp4").await;

    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert!(!samples.is_empty());
}

// =============================================================================
// Client errors
// =============================================================================

#[tokio::test]
async fn test_missing_file_field() {
    let response = setup_app()
        .oneshot(multipart::request("/denoise", &[Part::text("other", "value")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "No audio file uploaded"}));
}

#[tokio::test]
async fn test_text_field_named_file_is_missing_file() {
    // Same name as the upload field but no filename: a form value, not a file
    let input = generate_noisy_wav(&AudioConfig {
        duration_seconds: 0.5,
        lead_in_seconds: 0.25,
        ..Default::default()
    });
    let part = Part {
        name: "file",
        file_name: None,
        content_type: None,
        data: &input,
    };

    let response = setup_app()
        .oneshot(multipart::request("/denoise", &[part]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "No audio file uploaded"}));
}

#[tokio::test]
async fn test_non_multipart_request_is_missing_file() {
    let request = Request::builder()
        .method("POST")
        .uri("/denoise")
        .body(Body::empty())
        .unwrap();
    let response = setup_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "No audio file uploaded");
}

#[tokio::test]
async fn test_corrupt_upload_is_unprocessable() {
    let garbage = b"this is not audio at all".repeat(100);
    let response = setup_app()
        .oneshot(multipart::request("/denoise", &[Part::file(&garbage)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Could not decode audio"));
}

#[tokio::test]
async fn test_empty_file_is_unprocessable() {
    let response = setup_app()
        .oneshot(multipart::request("/denoise", &[Part::file(&[])]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let input = generate_noisy_wav(&AudioConfig {
        duration_seconds: 1.0,
        ..Default::default()
    });
    let app = build_router(AppState::new(1024));

    let response = app
        .oneshot(multipart::request("/denoise", &[Part::file(&input)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_denoise_not_allowed() {
    let request = Request::builder().uri("/denoise").body(Body::empty()).unwrap();
    let response = setup_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
