//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: access logging, header enforcement, latency
//! instrumentation.
//!
//! A stage implements [`Middleware::intercept`], receiving the request and a
//! [`Next`] continuation. Stages are composed by [`Pipeline`] as an explicit
//! ordered list — no closures capturing mutable continuation state. They run
//! in registration order on the way in and the reverse order on the way out:
//!
//! ```text
//! stage 1 → stage 2 → … → router → handler
//!                                     │
//! stage 1 ← stage 2 ← … ← router ←───┘
//! ```
//!
//! A stage that never calls [`Next::run`] short-circuits: downstream stages
//! and the handler are skipped entirely and its response travels back out
//! through the stages already entered.

use std::sync::Arc;

use http::StatusCode;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

pub mod access_log;
pub mod header_gate;
pub mod timing;

pub use access_log::{AccessLogger, AccessSink, FileSink};
pub use header_gate::HeaderGate;
pub use timing::ProcessTime;

/// A unit of request/response interception.
///
/// `intercept` owns the request. Run downstream with `next.run(req)`, or drop
/// `next` and return a response directly to short-circuit.
pub trait Middleware: Send + Sync + 'static {
    fn intercept(&self, req: Request, next: Next) -> BoxFuture;
}

/// The continuation handed to each stage: the stages that remain, then the
/// router.
///
/// Cheap to construct — two `Arc` clones and an index.
pub struct Next {
    stages: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    router: Arc<Router>,
}

impl Next {
    /// Runs the rest of the pipeline: the next stage if one remains,
    /// otherwise route lookup and the handler. Unmatched paths get `404`.
    pub fn run(self, mut req: Request) -> BoxFuture {
        match self.stages.get(self.index) {
            Some(stage) => {
                let stage = Arc::clone(stage);
                let next = Next { stages: self.stages, index: self.index + 1, router: self.router };
                stage.intercept(req, next)
            }
            None => match self.router.lookup(req.method(), req.path()) {
                Some((handler, params)) => {
                    req.set_params(params);
                    handler.call(req)
                }
                None => Box::pin(async { Response::status(StatusCode::NOT_FOUND) }),
            },
        }
    }
}

/// An ordered middleware pipeline wrapped around a [`Router`].
///
/// ```rust
/// use gatehouse::{Pipeline, Request, Response, Router};
/// use gatehouse::middleware::ProcessTime;
///
/// async fn hello(_req: Request) -> Response { Response::text("hi") }
///
/// let app = Pipeline::new(Router::new().get("/", hello))
///     .stage(ProcessTime::new());
/// ```
pub struct Pipeline {
    stages: Arc<[Arc<dyn Middleware>]>,
    router: Arc<Router>,
}

impl Pipeline {
    pub fn new(router: Router) -> Self {
        Self { stages: Vec::new().into(), router: Arc::new(router) }
    }

    /// Appends a stage. Stages run in the order they are appended.
    ///
    /// Rebuilds the stage list — fine at startup, which is the only time
    /// this runs. The hot path clones two `Arc`s per request and nothing
    /// else.
    pub fn stage(mut self, middleware: impl Middleware) -> Self {
        let mut stages: Vec<Arc<dyn Middleware>> = self.stages.to_vec();
        stages.push(Arc::new(middleware));
        self.stages = stages.into();
        self
    }

    /// Runs one request through every stage, the router, and the handler.
    ///
    /// This is the server's per-request entry point; it is public so the
    /// whole pipeline can be exercised in-process without a socket.
    pub async fn handle(&self, req: Request) -> Response {
        let next = Next {
            stages: Arc::clone(&self.stages),
            index: 0,
            router: Arc::clone(&self.router),
        };
        next.run(req).await
    }
}
