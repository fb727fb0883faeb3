//! Required-header enforcement stage.
//!
//! Requests to paths outside a fixed allow-list must carry a designated
//! header. Missing header → `400` with a plain-text explanation, and the
//! downstream stages and handler never run. The check is on the *request*
//! side only; nothing a handler puts on its response feeds back into it.

use http::StatusCode;
use tracing::error;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// Middleware stage that rejects requests lacking a required header.
pub struct HeaderGate {
    header: String,
    allowed: Vec<String>,
}

impl HeaderGate {
    /// Requires `header` (matched case-insensitively) on every request whose
    /// path is not in `allowed`.
    pub fn new(header: impl Into<String>, allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            header: header.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    fn exempt(&self, path: &str) -> bool {
        self.allowed.iter().any(|p| p == path)
    }
}

impl Middleware for HeaderGate {
    fn intercept(&self, req: Request, next: Next) -> BoxFuture {
        if !self.exempt(req.path()) && req.headers().get(&self.header).is_none() {
            error!("Missing {} in request to {}", self.header, req.path());
            let body = format!("{} is required.", self.header);
            return Box::pin(async move {
                Response::builder().status(StatusCode::BAD_REQUEST).text(body)
            });
        }
        next.run(req)
    }
}
