use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "resume-parsing";

/// GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// GET /
/// Returns service name, version and the available endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "parse": "POST /api/resume-parse"
        }
    }))
}
