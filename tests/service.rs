//! End-to-end tests for the service pipeline as wired in `main`:
//! access log → header gate → process time → router → handlers.

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use http::{Method, StatusCode};
use serde_json::{Value, json};

use gatehouse::middleware::{AccessLogger, AccessSink, HeaderGate, ProcessTime};
use gatehouse::{Pipeline, Request, Router, routes};

/// Captures access-log lines in memory so tests can assert on them.
struct MemorySink(Mutex<Vec<String>>);

impl MemorySink {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl AccessSink for MemorySink {
    fn append(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_owned());
    }
}

fn service() -> (Pipeline, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink(Mutex::new(Vec::new())));
    let app = Pipeline::new(
        Router::new()
            .get("/", routes::root)
            .get("/items", routes::items),
    )
    .stage(AccessLogger::new(Arc::clone(&sink) as Arc<dyn AccessSink>))
    .stage(HeaderGate::new(
        "X-Custom-Header",
        ["/docs", "/openapi.json", "/favicon.ico"],
    ))
    .stage(ProcessTime::new());
    (app, sink)
}

fn get(path: &str) -> Request {
    Request::new(Method::GET, path.parse().unwrap())
}

fn with_header(path: &str) -> Request {
    get(path).with_header("X-Custom-Header", "anything")
}

#[tokio::test]
async fn missing_header_is_rejected_with_400_and_fixed_body() {
    let (app, _) = service();

    for path in ["/", "/items", "/somewhere/else"] {
        let res = app.handle(get(path)).await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST, "path {path}");
        assert_eq!(res.body(), b"X-Custom-Header is required.", "path {path}");
    }
}

#[tokio::test]
async fn allow_listed_paths_are_never_rejected() {
    let (app, _) = service();

    for path in ["/docs", "/openapi.json", "/favicon.ico"] {
        // Without the header: no 400 — only the router's 404, since no
        // handler is registered for these paths.
        let res = app.handle(get(path)).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND, "path {path}");

        let res = app.handle(with_header(path)).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND, "path {path}");
    }
}

#[tokio::test]
async fn routed_responses_carry_a_parseable_process_time() {
    let (app, _) = service();

    for path in ["/", "/items"] {
        let res = app.handle(with_header(path)).await;
        let elapsed: f64 = res
            .header("x-process-time")
            .expect("x-process-time header")
            .parse()
            .expect("decimal seconds");
        assert!(elapsed >= 0.0, "path {path}");
    }
}

#[tokio::test]
async fn every_request_gets_exactly_one_access_log_line() {
    let (app, sink) = service();

    app.handle(with_header("/")).await; // served
    app.handle(get("/items")).await; // rejected by the gate
    app.handle(with_header("/missing?q=1")).await; // 404

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);

    for line in &lines {
        let close = line.find(']').expect("timestamp bracket");
        NaiveDateTime::parse_from_str(&line[1..close], "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp");
    }
    assert!(lines[0].ends_with("] GET /"));
    assert!(lines[1].ends_with("] GET /items"));
    assert!(lines[2].ends_with("] GET /missing?q=1"));
}

#[tokio::test]
async fn root_greets_and_sets_its_response_header() {
    let (app, _) = service();
    let res = app.handle(with_header("/")).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"Hello world");
    assert_eq!(res.header("x-custom-header"), Some("Hello World"));
}

#[tokio::test]
async fn items_returns_the_expected_json() {
    let (app, _) = service();
    let res = app.handle(with_header("/items")).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body, json!({ "items": ["foo", "bar"] }));
}

#[tokio::test]
async fn rejected_requests_skip_timing() {
    let (app, _) = service();
    let res = app.handle(get("/items")).await;

    // The gate sits before the timing stage, so a short-circuited response
    // never gains the header.
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert!(res.header("x-process-time").is_none());
}
