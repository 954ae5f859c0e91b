//! `GET /health`

use crate::fake_api::io::Response;

pub fn handle_health() -> Response {
    Response::ok(serde_json::json!({
        "status": "healthy",
        "service": "anti-spam-api",
    }))
}
