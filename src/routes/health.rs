use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness probe for the taskboard service.
///
/// Sits outside `/api` and the auth middleware, so it answers even when no
/// session is present. The body carries the fixed `"ok"` status and the
/// server-side timestamp of the check.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}
