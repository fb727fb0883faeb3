//! The service's route handlers.
//!
//! Two placeholder endpoints. Register them on a router:
//!
//! ```rust
//! use gatehouse::{Router, routes};
//!
//! let app = Router::new()
//!     .get("/", routes::root)
//!     .get("/items", routes::items);
//! ```

use http::StatusCode;
use serde_json::json;

use crate::request::Request;
use crate::response::Response;

/// `GET /`
///
/// Sets `X-Custom-Header` on the *response*. This shares a name with the
/// header the gate requires on *requests*; the two are independent — the
/// gate never looks at responses.
pub async fn root(_req: Request) -> Response {
    Response::builder()
        .header("x-custom-header", "Hello World")
        .text("Hello world")
}

/// `GET /items`
pub async fn items(_req: Request) -> Response {
    match serde_json::to_vec(&json!({ "items": ["foo", "bar"] })) {
        Ok(body) => Response::json(body),
        Err(_) => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
