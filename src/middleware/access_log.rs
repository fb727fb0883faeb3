//! Access logging stage.
//!
//! Every inbound request gets exactly one line in a dedicated append-only
//! sink, before any other stage runs — so rejected requests are recorded
//! too. The sink is separate from the general diagnostic log (`tracing`):
//! the access log is a durable record of raw traffic, not telemetry.
//!
//! Line format, local wall-clock at second resolution:
//!
//! ```text
//! [2026-08-30 14:03:07] GET /items
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;

/// Destination for access-log lines.
///
/// Implementations must tolerate concurrent appends without interleaving
/// lines. The stage writes best-effort: `append` has no error channel and a
/// failed write must never surface into the request.
pub trait AccessSink: Send + Sync + 'static {
    fn append(&self, line: &str);
}

/// [`AccessSink`] backed by an append-only file.
///
/// A mutex serializes writers; each line lands as a single `write_all`, so
/// concurrent requests cannot corrupt the file.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Opens (or creates) `path` in append mode.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Mutex::new(file) })
    }
}

impl AccessSink for FileSink {
    fn append(&self, line: &str) {
        let mut buf = Vec::with_capacity(line.len() + 1);
        let _ = writeln!(buf, "{line}");
        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = file.write_all(&buf) {
                tracing::warn!("access log write failed: {e}");
            }
        }
    }
}

/// Middleware stage that records every inbound request to an [`AccessSink`].
pub struct AccessLogger {
    sink: Arc<dyn AccessSink>,
}

impl AccessLogger {
    pub fn new(sink: Arc<dyn AccessSink>) -> Self {
        Self { sink }
    }
}

impl Middleware for AccessLogger {
    fn intercept(&self, req: Request, next: Next) -> BoxFuture {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.sink.append(&format!("[{stamp}] {} {}", req.method(), req.uri()));
        next.run(req)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use chrono::NaiveDateTime;
    use http::Method;

    use super::*;
    use crate::middleware::Pipeline;
    use crate::response::Response;
    use crate::router::Router;

    /// In-memory sink for asserting on recorded lines.
    struct MemorySink(Mutex<Vec<String>>);

    impl AccessSink for MemorySink {
        fn append(&self, line: &str) {
            self.0.lock().unwrap().push(line.to_owned());
        }
    }

    async fn hello(_req: Request) -> Response {
        Response::text("hello")
    }

    #[tokio::test]
    async fn records_one_line_with_timestamp_method_and_url() {
        let sink = Arc::new(MemorySink(Mutex::new(Vec::new())));
        let app = Pipeline::new(Router::new().get("/items", hello))
            .stage(AccessLogger::new(Arc::clone(&sink) as Arc<dyn AccessSink>));

        app.handle(Request::new(Method::GET, "/items?page=2".parse().unwrap())).await;

        let lines = sink.0.lock().unwrap();
        assert_eq!(lines.len(), 1);

        let line = &lines[0];
        let close = line.find(']').expect("timestamp bracket");
        NaiveDateTime::parse_from_str(&line[1..close], "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp");
        assert_eq!(&line[close + 1..], " GET /items?page=2");
    }

    #[tokio::test]
    async fn records_unrouted_requests_too() {
        let sink = Arc::new(MemorySink(Mutex::new(Vec::new())));
        let app = Pipeline::new(Router::new())
            .stage(AccessLogger::new(Arc::clone(&sink) as Arc<dyn AccessSink>));

        app.handle(Request::new(Method::GET, "/missing".parse().unwrap())).await;

        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn file_sink_survives_concurrent_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.log");
        let sink = Arc::new(FileSink::open(&path).unwrap());

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..64 {
            let sink = Arc::clone(&sink);
            tasks.spawn(async move {
                sink.append(&format!("[2026-08-30 00:00:00] GET /{i}"));
            });
        }
        while tasks.join_next().await.is_some() {}

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 64);
        for line in lines {
            assert!(line.starts_with("[2026-08-30 00:00:00] GET /"));
        }
    }

    #[test]
    fn file_sink_appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.log");

        FileSink::open(&path).unwrap().append("[2026-08-30 00:00:00] GET /a");
        FileSink::open(&path).unwrap().append("[2026-08-30 00:00:01] GET /b");

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
