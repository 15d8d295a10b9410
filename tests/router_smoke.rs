use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use recordsd::{router, AppState, Options, Store};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn app(prefix: &str) -> Router {
    let db_path = temp_dir(prefix).join("records.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    router(AppState::new(Arc::new(store), Options::default()))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value: Value = serde_json::from_slice(&bytes).expect("parse response json");
    (status, headers, value)
}

#[tokio::test]
async fn health_reports_version() {
    let app = app("recordsd-smoke-health");
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": { "status": "ok", "version": env!("CARGO_PKG_VERSION") } })
    );
}

#[tokio::test]
async fn unknown_route_is_a_json_not_found() {
    let app = app("recordsd-smoke-404");
    let req = Request::builder()
        .uri("/teachers")
        .body(Body::empty())
        .expect("request");
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "not found" }));
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = app("recordsd-smoke-bad-json");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/courses")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"courseName\": "))
        .expect("request");
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("message").and_then(|v| v.as_str()).is_some());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/courses")
        .body(Body::from("{\"courseName\": \"Math\"}"))
        .expect("request");
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("message").is_some());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/students")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[1, 2, 3]"))
        .expect("request");
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "Student validation failed: request body must be a JSON object" })
    );
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = app("recordsd-smoke-cors");
    let req = Request::builder()
        .uri("/students")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .expect("request");
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[test]
fn daemon_exits_without_database_location() {
    let workdir = temp_dir("recordsd-smoke-no-db");
    let status = Command::new(env!("CARGO_BIN_EXE_recordsd"))
        .current_dir(&workdir)
        .env_remove("RECORDS_DB")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("run recordsd");
    assert!(!status.success());
}

#[test]
fn daemon_creates_its_database_on_startup() {
    let workdir = temp_dir("recordsd-smoke-startup");
    let db_path = workdir.join("data").join("records.sqlite3");
    let mut child = Command::new(env!("CARGO_BIN_EXE_recordsd"))
        .current_dir(&workdir)
        .env("RECORDS_DB", &db_path)
        .env("HOST", "127.0.0.1")
        .env("PORT", "0")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn recordsd");

    let deadline = Instant::now() + Duration::from_secs(10);
    while !db_path.is_file() && Instant::now() < deadline {
        if let Some(status) = child.try_wait().expect("poll child") {
            panic!("recordsd exited early: {status}");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    let _ = child.kill();
    let _ = child.wait();
    assert!(db_path.is_file(), "database file was not created");
}
