//! Process bootstrap: wire the pipeline, bind the listener.
//!
//! Try:
//!   curl -H 'X-Custom-Header: anything' http://127.0.0.1:8000/
//!   curl -H 'X-Custom-Header: anything' http://127.0.0.1:8000/items
//!   curl http://127.0.0.1:8000/items          # → 400, gate rejection
//!   tail requests.log

use std::sync::Arc;

use gatehouse::middleware::{AccessLogger, FileSink, HeaderGate, ProcessTime};
use gatehouse::{Pipeline, Router, Server, routes};

const ADDR: &str = "127.0.0.1:8000";
const ACCESS_LOG: &str = "requests.log";
const REQUIRED_HEADER: &str = "X-Custom-Header";
const GATE_EXEMPT: [&str; 3] = ["/docs", "/openapi.json", "/favicon.ico"];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let sink = Arc::new(FileSink::open(ACCESS_LOG).expect("open access log"));

    let app = Pipeline::new(
        Router::new()
            .get("/", routes::root)
            .get("/items", routes::items),
    )
    .stage(AccessLogger::new(sink))
    .stage(HeaderGate::new(REQUIRED_HEADER, GATE_EXEMPT))
    .stage(ProcessTime::new());

    Server::bind(ADDR).serve(app).await.expect("server error");
}
