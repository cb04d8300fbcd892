//! API integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adreel_api::{create_router, AnalysisProvider, ApiConfig, AppState, SimulatedProvider, TwelveLabsProvider};
use adreel_twelvelabs::{TwelveLabsClient, TwelveLabsConfig};

const BOUNDARY: &str = "adreel-test-boundary";

// =============================================================================
// Test Helpers
// =============================================================================

fn router_with(config: ApiConfig, provider: Arc<dyn AnalysisProvider>) -> Router {
    create_router(AppState::with_provider(config, provider), None)
}

/// Router whose simulated analysis finishes on the first status check.
fn instant_router() -> Router {
    router_with(ApiConfig::for_tests(), Arc::new(SimulatedProvider::new(Duration::ZERO)))
}

/// Router whose simulated analysis never gets past the first stage.
fn slow_router() -> Router {
    router_with(
        ApiConfig::for_tests(),
        Arc::new(SimulatedProvider::new(Duration::from_secs(3600))),
    )
}

fn twelvelabs_router(server: &MockServer, index: Option<&str>) -> Router {
    let mut config = TwelveLabsConfig::new("tlk_test").with_base_url(server.uri());
    if let Some(index) = index {
        config = config.with_index_id(index);
    }
    let provider = TwelveLabsProvider::new(TwelveLabsClient::new(config).unwrap());
    router_with(ApiConfig::for_tests(), Arc::new(provider))
}

fn url_form(url: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"url\"\r\n\r\n{url}\r\n--{b}--\r\n",
        b = BOUNDARY,
        url = url
    )
    .into_bytes()
}

fn file_form(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: {ct}\r\n\r\n",
        b = BOUNDARY,
        f = filename,
        ct = content_type
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/videos")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn upload_url(app: &Router, url: &str) -> String {
    let (status, body) = send(app, upload_request(url_form(url))).await;
    assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
    body["videoId"].as_str().unwrap().to_string()
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let app = instant_router();

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Video Analysis API", "status": "running"}));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "simulated");
    assert_eq!(body["twelvelabs_configured"], false);
}

#[tokio::test]
async fn test_metrics_route_absent_without_handle() {
    let (status, _) = send(&instant_router(), get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_templates_listed() {
    let (status, body) = send(&instant_router(), get("/api/templates")).await;
    assert_eq!(status, StatusCode::OK);
    let templates = body.as_array().unwrap();
    assert_eq!(templates.len(), 4);
    assert_eq!(templates[0]["id"], "social-story");
    assert_eq!(templates[0]["aspect_ratios"], json!(["9:16"]));
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_url_returns_video_id() {
    let app = instant_router();
    let video_id = upload_url(&app, "https://cdn.example.com/spot.mp4").await;
    assert!(video_id.starts_with("vid_"));
    assert_eq!(video_id.len(), 12);
}

#[tokio::test]
async fn test_upload_requires_file_or_url() {
    let empty = format!("--{}--\r\n", BOUNDARY).into_bytes();
    let (status, body) = send(&instant_router(), upload_request(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Provide either file or url");
}

#[tokio::test]
async fn test_upload_rejects_malformed_url() {
    let app = instant_router();

    let (status, body) = send(&app, upload_request(url_form("not a url"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().starts_with("Invalid URL"));

    let (status, _) = send(&app, upload_request(url_form("ftp://cdn.example.com/a.mp4"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_file() {
    let app = instant_router();

    let (status, body) = send(
        &app,
        upload_request(file_form("spot.mp4", "video/mp4", b"FAKEVIDEOBYTES")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = send(&app, get("/api/videos")).await;
    assert_eq!(list[0]["id"], body["videoId"]);
    assert_eq!(list[0]["filename"], "spot.mp4");
}

#[tokio::test]
async fn test_upload_prefers_url_over_file() {
    let app = instant_router();

    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"url\"\r\n\r\nhttps://cdn.example.com/remote.mp4\r\n",
        b = BOUNDARY
    )
    .into_bytes();
    body.extend(file_form("local.mp4", "video/mp4", b"FAKEVIDEOBYTES"));

    let (status, _) = send(&app, upload_request(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = send(&app, get("/api/videos")).await;
    assert_eq!(list[0]["url"], "https://cdn.example.com/remote.mp4");
    assert!(list[0].get("filename").is_none());
}

#[tokio::test]
async fn test_upload_rejects_non_video_file() {
    let (status, body) = send(
        &instant_router(),
        upload_request(file_form("notes.txt", "text/plain", b"hello")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("notes.txt"));
}

#[tokio::test]
async fn test_upload_over_body_limit_is_413() {
    let config = ApiConfig {
        max_body_size: 1024,
        ..ApiConfig::for_tests()
    };
    let app = router_with(config, Arc::new(SimulatedProvider::new(Duration::ZERO)));

    let (status, _) = send(
        &app,
        upload_request(file_form("spot.mp4", "video/mp4", &[0u8; 4096])),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// Status polling
// =============================================================================

#[tokio::test]
async fn test_status_unknown_video_is_404() {
    let (status, body) = send(&instant_router(), get("/api/videos/vid_00000000/status")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Video not found");
}

#[tokio::test]
async fn test_status_reaches_completed_with_analysis() {
    let app = instant_router();
    let video_id = upload_url(&app, "https://cdn.example.com/spot.mp4").await;

    let (status, body) = send(&app, get(&format!("/api/videos/{}/status", video_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], video_id.as_str());
    assert_eq!(body["status"], "completed");
    assert_eq!(body["progress"], 100);
    assert!(body["task_id"].as_str().unwrap().starts_with("sim_"));
    assert!(body["analysis"]["scenes"].is_array());

    let (status, details) = send(&app, get(&format!("/api/videos/{}", video_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["videoId"], video_id.as_str());
    assert_eq!(details["scenes"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_status_in_progress_and_details_not_ready() {
    let app = slow_router();
    let video_id = upload_url(&app, "https://cdn.example.com/spot.mp4").await;

    let (_, body) = send(&app, get(&format!("/api/videos/{}/status", video_id))).await;
    assert_eq!(body["status"], "processing");
    assert_eq!(body["progress"], 25);
    assert!(body.get("analysis").is_none());

    let (status, body) = send(&app, get(&format!("/api/videos/{}", video_id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Video analysis not yet complete");
}

#[tokio::test]
async fn test_failed_analysis_is_terminal() {
    let app = instant_router();
    let video_id = upload_url(&app, "https://cdn.example.com/fail.mp4").await;
    let uri = format!("/api/videos/{}/status", video_id);

    let (_, first) = send(&app, get(&uri)).await;
    assert_eq!(first["status"], "error");
    assert_eq!(first["progress"], 0);
    assert!(first["error"].as_str().unwrap().contains("fail.mp4"));

    // a second check serves the settled record
    let (_, second) = send(&app, get(&uri)).await;
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = slow_router();
    upload_url(&app, "https://cdn.example.com/a.mp4").await;
    upload_url(&app, "https://cdn.example.com/b.mp4").await;

    let (_, all) = send(&app, get("/api/videos")).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    // newest first
    assert_eq!(all[0]["url"], "https://cdn.example.com/b.mp4");

    let (_, processing) = send(&app, get("/api/videos?status=processing")).await;
    assert_eq!(processing.as_array().unwrap().len(), 2);

    let (_, completed) = send(&app, get("/api/videos?status=completed")).await;
    assert!(completed.as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/api/videos?status=finished")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Edits
// =============================================================================

#[tokio::test]
async fn test_edit_flow() {
    let app = instant_router();
    let video_id = upload_url(&app, "https://cdn.example.com/spot.mp4").await;
    send(&app, get(&format!("/api/videos/{}/status", video_id))).await;

    let request = json!({
        "video_id": video_id,
        "scene_ids": [1, 3, 5],
        "aspect_ratios": ["9:16", "1:1"],
        "durations": [15],
        "caption_style": "bold",
        "template_id": "custom"
    });
    let (status, body) = send(&app, post_json("/api/edits", request)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "queued");
    assert_eq!(body["files"].as_array().unwrap().len(), 2);
    assert_eq!(body["files"][0]["scene_ids"], json!([1, 3, 5]));

    let job_id = body["job_id"].as_str().unwrap();
    let (status, plan) = send(&app, get(&format!("/api/edits/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["video_id"], video_id.as_str());
    assert_eq!(plan["caption_style"], "bold");

    let (status, _) = send(&app, get("/api/edits/edit_00000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_rejections() {
    let app = slow_router();
    let video_id = upload_url(&app, "https://cdn.example.com/spot.mp4").await;

    let request = |video_id: &str, scene_ids: Value| {
        json!({
            "video_id": video_id,
            "scene_ids": scene_ids,
            "aspect_ratios": ["9:16"],
            "durations": [15]
        })
    };

    let (status, _) = send(&app, post_json("/api/edits", request("vid_00000000", json!([1])))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, post_json("/api/edits", request(video_id.as_str(), json!([1])))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Video analysis not yet complete");

    let done = instant_router();
    let video_id = upload_url(&done, "https://cdn.example.com/spot.mp4").await;
    send(&done, get(&format!("/api/videos/{}/status", video_id))).await;

    let (status, body) = send(&done, post_json("/api/edits", request(video_id.as_str(), json!([42])))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Unknown scene id: 42");

    let (status, _) = send(&done, post_json("/api/edits", request(video_id.as_str(), json!([])))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// TwelveLabs relay
// =============================================================================

#[tokio::test]
async fn test_missing_index_is_500_with_setup_hint() {
    let server = MockServer::start().await;
    let app = twelvelabs_router(&server, None);

    let (status, body) = send(&app, upload_request(url_form("https://cdn.example.com/spot.mp4"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Create your TwelveLabs index once and set TL_INDEX_ID in .env"
    );
}

#[tokio::test]
async fn test_provider_rejection_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine down"))
        .mount(&server)
        .await;

    let app = twelvelabs_router(&server, Some("idx_1"));
    let (status, body) = send(&app, upload_request(url_form("https://cdn.example.com/spot.mp4"))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["detail"], "TwelveLabs API error: HTTP 500: engine down");

    let (_, list) = send(&app, get("/api/videos")).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_twelvelabs_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "task_1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/task_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "task_1", "status": "indexing"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/task_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "task_1",
            "status": "ready",
            "video_id": "tlvid_1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/idx_1/videos/tlvid_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "tlvid_1",
            "index_id": "idx_1",
            "system_metadata": {"filename": "spot.mp4", "duration": 12.0, "width": 1080, "height": 1920}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sum_1",
            "summarize_type": "chapter",
            "chapters": [
                {"chapter_number": 1, "start_sec": 0.0, "end_sec": 5.0, "chapter_title": "Intro"},
                {"chapter_number": 2, "start_sec": 5.0, "end_sec": 12.0, "chapter_summary": "Happy customers celebrate"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = twelvelabs_router(&server, Some("idx_1"));
    let video_id = upload_url(&app, "https://cdn.example.com/spot.mp4").await;
    let uri = format!("/api/videos/{}/status", video_id);

    let (_, body) = send(&app, get(&uri)).await;
    assert_eq!(body["status"], "indexing");
    assert_eq!(body["progress"], 50);
    assert_eq!(body["message"], "Analyzing video content");
    assert_eq!(body["task_id"], "task_1");

    let (_, body) = send(&app, get(&uri)).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["analysis"]["_id"], "tlvid_1");

    // analysis is cached; neither endpoint is hit again
    send(&app, get(&uri)).await;

    let (_, details) = send(&app, get(&format!("/api/videos/{}", video_id))).await;
    assert_eq!(details["scenes"].as_array().unwrap().len(), 2);
    assert_eq!(details["scenes"][1]["sentiment"], "positive");

    let (status, edit) = send(
        &app,
        post_json(
            "/api/edits",
            json!({
                "video_id": video_id,
                "scene_ids": [1, 2],
                "aspect_ratios": ["9:16"],
                "durations": [6]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED, "edit failed: {}", edit);
    assert_eq!(edit["files"][0]["scene_ids"], json!([1, 2]));
}

#[tokio::test]
async fn test_status_check_failure_returns_cached_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "task_1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/task_1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let app = twelvelabs_router(&server, Some("idx_1"));
    let video_id = upload_url(&app, "https://cdn.example.com/spot.mp4").await;

    let (status, body) = send(&app, get(&format!("/api/videos/{}/status", video_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "processing");
    assert_eq!(body["progress"], 10);
    assert_eq!(
        body["message"],
        "Status check failed: TwelveLabs API error: HTTP 503: maintenance"
    );
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_rate_limiting() {
    let config = ApiConfig {
        rate_limit_rps: 2,
        ..ApiConfig::for_tests()
    };
    let app = router_with(config, Arc::new(SimulatedProvider::new(Duration::ZERO)));

    let request = || {
        Request::builder()
            .uri("/api/templates")
            .header("X-Forwarded-For", "192.168.1.100")
            .body(Body::empty())
            .unwrap()
    };

    let mut limited = false;
    for _ in 0..10 {
        let response = app.clone().oneshot(request()).await.unwrap();
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            assert_eq!(response.headers()["retry-after"], "1");
            limited = true;
            break;
        }
    }
    assert!(limited, "expected a 429 within 10 requests");

    // health is outside the limited routes
    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_localhost_by_default() {
    let app = instant_router();

    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/videos")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let response = app.clone().oneshot(preflight("https://evil.example.com")).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let response = instant_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
