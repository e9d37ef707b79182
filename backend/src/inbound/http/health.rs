//! Liveness probe.

use actix_web::{get, HttpResponse};

/// Report process liveness.
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is live")),
    tags = ["health"],
    operation_id = "healthz",
    security([])
)]
#[get("/healthz")]
pub async fn healthz() -> HttpResponse {
    HttpResponse::Ok().finish()
}
