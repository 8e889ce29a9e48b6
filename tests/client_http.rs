
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use luminous_client::*;
use serde_json::{json, Value};
use tempfile::tempdir;
use test_helpers::{form, RecordingPresenter};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// A stand-in for the generation service: accepts every job and reports it
/// ready after `pending_polls` status queries.
#[derive(Clone)]
struct FakeService {
    bodies: Arc<Mutex<Vec<Value>>>,
    polls: Arc<AtomicUsize>,
    pending_polls: usize,
    generate_status: &'static str,
}

impl FakeService {
    fn new(pending_polls: usize) -> Self {
        Self {
            bodies: Arc::new(Mutex::new(Vec::new())),
            polls: Arc::new(AtomicUsize::new(0)),
            pending_polls,
            generate_status: "success",
        }
    }
}

async fn generate(State(fake): State<FakeService>, Json(body): Json<Value>) -> Json<Value> {
    fake.bodies.lock().unwrap().push(body);
    Json(json!({
        "jobId": "job-1",
        "status": fake.generate_status,
        "previewUrl": null,
        "message": "Wallpaper generation started",
    }))
}

async fn preview(
    State(fake): State<FakeService>,
    Path(job_id): Path<String>,
) -> axum::response::Response {
    if job_id == "garbled" {
        return "<html>upstream error</html>".into_response();
    }
    if job_id != "job-1" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Job not found"}))).into_response();
    }
    let seen = fake.polls.fetch_add(1, Ordering::SeqCst);
    if seen < fake.pending_polls {
        Json(json!({"jobId": job_id, "status": "processing", "message": "Wallpaper still processing"}))
            .into_response()
    } else {
        Json(json!({
            "jobId": job_id,
            "status": "success",
            "previewUrl": "/static/previews/wallpaper_test.png",
            "message": "Preview available",
        }))
        .into_response()
    }
}

async fn static_preview(Path(file): Path<String>) -> axum::response::Response {
    if file == "wallpaper_test.png" {
        PNG.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn download(Path(job_id): Path<String>) -> axum::response::Response {
    if job_id == "job-1" {
        PNG.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn spawn_server(fake: FakeService) -> String {
    let app = Router::new()
        .route("/", get(|| async { "Luminous" }))
        .route("/generate", post(generate))
        .route("/preview/{job_id}", get(preview))
        .route("/static/previews/{file}", get(static_preview))
        .route("/download/{job_id}", get(download))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health() {
    let endpoint = spawn_server(FakeService::new(0)).await;
    let client = LuminousClient::new(endpoint);
    assert!(client.health().await.unwrap());
}

#[tokio::test]
async fn test_generate_posts_request_body() {
    let fake = FakeService::new(0);
    let endpoint = spawn_server(fake.clone()).await;
    let client = LuminousClient::new(endpoint);

    let request = GenerationRequest::new(Color::Yellow, Style::Geometric, "tiles")
        .with_resolution(Resolution::new(1280, 720).unwrap())
        .with_color_temp(ColorTemp::new(5000));
    let job_id = client.generate(&request).await.unwrap();
    assert_eq!(job_id.as_str(), "job-1");

    let bodies = fake.bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({
            "color": "yellow",
            "style": "geometric",
            "description": "tiles",
            "resolution": "1280x720",
            "colorTemp": "5000",
        })]
    );
}

#[tokio::test]
async fn test_generate_non_success_status_is_rejected() {
    let mut fake = FakeService::new(0);
    fake.generate_status = "error";
    let endpoint = spawn_server(fake).await;
    let client = LuminousClient::new(endpoint);

    let request = GenerationRequest::new(Color::Red, Style::Gradient, "");
    let result = client.generate(&request).await;
    assert!(matches!(result, Err(LuminousError::Rejected(_))));
}

#[tokio::test]
async fn test_preview_unknown_job_is_http_error() {
    let endpoint = spawn_server(FakeService::new(0)).await;
    let client = LuminousClient::new(endpoint);

    let result = client.preview(&JobId::new("nope")).await;
    match result {
        Err(LuminousError::Http { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("Job not found"));
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_preview_body_that_is_not_json_is_json_error() {
    let endpoint = spawn_server(FakeService::new(0)).await;
    let client = LuminousClient::new(endpoint);

    let result = client.preview(&JobId::new("garbled")).await;
    assert!(matches!(result, Err(LuminousError::Json(_))));
}

#[tokio::test]
async fn test_preview_reports_processing_then_success() {
    let endpoint = spawn_server(FakeService::new(1)).await;
    let client = LuminousClient::new(endpoint);
    let job = JobId::new("job-1");

    let first = client.preview(&job).await.unwrap();
    assert_eq!(first.status, PreviewStatus::Pending("processing".into()));
    assert_eq!(first.ready_url(), None);

    let second = client.preview(&job).await.unwrap();
    assert_eq!(second.ready_url(), Some("/static/previews/wallpaper_test.png"));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = LuminousClient::new(endpoint).with_request_timeout(Duration::from_secs(2));
    let request = GenerationRequest::new(Color::Blue, Style::Abstract, "");
    let result = client.generate(&request).await;
    assert!(matches!(result, Err(LuminousError::Network { .. })));
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let fake = FakeService::new(2);
    let endpoint = spawn_server(fake.clone()).await;
    let client = Arc::new(LuminousClient::new(endpoint));
    let presenter = Arc::new(RecordingPresenter::default());
    let controller = WallpaperController::new(
        Arc::clone(&client),
        Arc::clone(&presenter),
        PollSettings::every(Duration::from_millis(20)).with_timeout(Duration::from_secs(10)),
        ColorTemp::default(),
    );

    controller
        .on_submit(&form("violet", "gradient", "aurora"))
        .await
        .unwrap();
    let link = match controller.wait().await {
        PollState::Done { link, .. } => link,
        other => panic!("expected Done, got {:?}", other),
    };
    assert_eq!(fake.polls.load(Ordering::SeqCst), 3);
    assert_eq!(presenter.results(), vec!["/static/previews/wallpaper_test.png".to_string()]);

    let dir = tempdir().unwrap();
    let path = client.download_preview(&link, dir.path()).await.unwrap();
    assert_eq!(path, dir.path().join("luminous-wallpaper.png"));
    assert_eq!(std::fs::read(&path).unwrap(), PNG);
}

#[tokio::test]
async fn test_download_job() {
    let endpoint = spawn_server(FakeService::new(0)).await;
    let client = LuminousClient::new(endpoint);
    let dir = tempdir().unwrap();

    let path = client
        .download_job(&JobId::new("job-1"), dir.path())
        .await
        .unwrap();
    assert_eq!(path, dir.path().join("luminous-wallpaper-job-1.png"));

    let missing = client.download_job(&JobId::new("job-9"), dir.path()).await;
    assert!(matches!(missing, Err(LuminousError::Http { status: 404, .. })));
}
