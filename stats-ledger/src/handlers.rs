use crate::error::Error;
use crate::state::AppState;
use crate::types::{Admission, Location, Transaction};
use actix_web::{http::header::HeaderValue, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::json;

/// Header carrying the caller's claimed city
pub const CITY_HEADER: &str = "X-End-User-City";

// ===== Health Check =====
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ===== Prometheus Metrics =====
pub async fn metrics_endpoint(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let body = state.metrics.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== Submit Transaction =====
pub async fn post_transaction(
    body: web::Json<Transaction>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let now = Utc::now();

    match state.submit_transaction(body.into_inner(), now) {
        Admission::Accepted => Ok(HttpResponse::Created().finish()),
        Admission::Stale => Ok(HttpResponse::NoContent().finish()),
        Admission::Future => Err(Error::FutureTimestamp),
    }
}

// ===== Delete Transactions =====
pub async fn delete_transactions(state: web::Data<AppState>) -> HttpResponse {
    state.clear_transactions();
    HttpResponse::NoContent().finish()
}

// ===== Get Statistics =====
pub async fn get_statistics(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let stats = state.statistics_for(claimed_city(&req), Utc::now())?;

    Ok(HttpResponse::Ok().json(stats))
}

// ===== Set Location =====
pub async fn set_location(
    body: web::Json<Location>,
    state: web::Data<AppState>,
) -> HttpResponse {
    state.gate.set_location(body.into_inner().city);
    HttpResponse::Created().finish()
}

// ===== Reset Location =====
pub async fn reset_location(state: web::Data<AppState>) -> HttpResponse {
    state.gate.reset_location();
    HttpResponse::NoContent().finish()
}

/// Raw bytes of the claimed city; an absent header claims the empty string
fn claimed_city(req: &HttpRequest) -> &[u8] {
    req.headers()
        .get(CITY_HEADER)
        .map(HeaderValue::as_bytes)
        .unwrap_or_default()
}

/// Body decoding for every JSON route: any failure is a 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| Error::MalformedBody(err.to_string()).into())
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource("/transactions")
                .route(web::post().to(post_transaction))
                .route(web::delete().to(delete_transactions)),
        )
        .route("/statistics", web::get().to(get_statistics))
        .route("/location", web::post().to(set_location))
        .route("/location/reset", web::post().to(reset_location))
        .route("/metrics", web::get().to(metrics_endpoint))
        .route("/health", web::get().to(health_check));
}
