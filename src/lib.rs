//! # gatehouse
//!
//! A small HTTP service built around one idea: an explicit, ordered
//! middleware pipeline wrapped around every request/response cycle.
//!
//! ## The pipeline
//!
//! Stages run in registration order on the way in and the reverse order on
//! the way out, each receiving the request and a continuation for the rest
//! of the pipeline:
//!
//! ```text
//! access log → header gate → timing → router → handler
//! ```
//!
//! - [`middleware::AccessLogger`] — one line per inbound request to an
//!   append-only sink, recorded before anything else can reject it.
//! - [`middleware::HeaderGate`] — requests outside a fixed allow-list must
//!   carry a required header or are refused with `400` before any handler
//!   runs.
//! - [`middleware::ProcessTime`] — stamps downstream latency onto the
//!   response as `x-process-time`.
//!
//! Each stage is an [`middleware::Middleware`] value constructed in `main`
//! with its dependencies injected — there are no ambient globals, so any
//! slice of the pipeline can be driven in-process by tests via
//! [`Pipeline::handle`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gatehouse::middleware::{AccessLogger, FileSink, HeaderGate, ProcessTime};
//! use gatehouse::{Pipeline, Router, Server, routes};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sink = Arc::new(FileSink::open("requests.log").expect("open access log"));
//!
//!     let app = Pipeline::new(
//!         Router::new()
//!             .get("/", routes::root)
//!             .get("/items", routes::items),
//!     )
//!     .stage(AccessLogger::new(sink))
//!     .stage(HeaderGate::new("X-Custom-Header", ["/docs", "/openapi.json", "/favicon.ico"]))
//!     .stage(ProcessTime::new());
//!
//!     Server::bind("127.0.0.1:8000").serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;
pub mod routes;

pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use middleware::{Next, Pipeline};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
