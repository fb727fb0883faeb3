//! Response-time instrumentation stage.
//!
//! Wraps everything downstream in a wall-clock measurement, stamps the
//! elapsed seconds onto the response as `x-process-time`, and emits one
//! info-level diagnostic line per request. Status and body pass through
//! untouched.

use std::time::Instant;

use tracing::info;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;

pub(crate) const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Middleware stage that reports downstream latency.
pub struct ProcessTime;

impl ProcessTime {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessTime {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for ProcessTime {
    fn intercept(&self, req: Request, next: Next) -> BoxFuture {
        let method = req.method().clone();
        let url = req.uri().to_string();
        Box::pin(async move {
            let start = Instant::now();
            let mut res = next.run(req).await;
            let elapsed = start.elapsed().as_secs_f64();
            res.insert_header(PROCESS_TIME_HEADER, &elapsed.to_string());
            info!("Processed {method} request to {url} in {elapsed:.4} seconds");
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::{Method, StatusCode};

    use super::*;
    use crate::middleware::Pipeline;
    use crate::response::Response;
    use crate::router::Router;

    fn get(path: &str) -> Request {
        Request::new(Method::GET, path.parse().unwrap())
    }

    #[tokio::test]
    async fn stamps_elapsed_seconds_on_the_response() {
        async fn slow(_req: Request) -> Response {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Response::text("done")
        }

        let app = Pipeline::new(Router::new().get("/", slow)).stage(ProcessTime::new());
        let res = app.handle(get("/")).await;

        let elapsed: f64 = res
            .header(PROCESS_TIME_HEADER)
            .expect("x-process-time header")
            .parse()
            .expect("decimal seconds");
        assert!(elapsed >= 0.010);
    }

    #[tokio::test]
    async fn preserves_status_body_and_handler_headers() {
        async fn teapot(_req: Request) -> Response {
            Response::builder()
                .status(StatusCode::IM_A_TEAPOT)
                .header("x-flavor", "earl-grey")
                .text("short and stout")
        }

        let app = Pipeline::new(Router::new().get("/", teapot)).stage(ProcessTime::new());
        let res = app.handle(get("/")).await;

        assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
        assert_eq!(res.body(), b"short and stout");
        assert_eq!(res.header("x-flavor"), Some("earl-grey"));
    }

    #[tokio::test]
    async fn stamps_404_fallthrough_responses_too() {
        let app = Pipeline::new(Router::new()).stage(ProcessTime::new());
        let res = app.handle(get("/missing")).await;

        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        let elapsed: f64 = res.header(PROCESS_TIME_HEADER).unwrap().parse().unwrap();
        assert!(elapsed >= 0.0);
    }
}
