use crate::errors::{RegistryError, RegistryResult};
use crate::metrics::{self, RISKS_CREATED, RISKS_STORED, RISK_LOOKUPS, RISK_VALIDATION_FAILURES};
use crate::models::*;
use crate::store::RiskStore;
use actix_web::{web, HttpResponse, ResponseError};
use tracing::{debug, info, warn};
use uuid::Uuid;

// ===== Health Check =====
pub async fn health_check(store: web::Data<RiskStore>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        risks_stored: store.len(),
    })
}

// ===== Prometheus Exposition =====
pub async fn metrics_endpoint(store: web::Data<RiskStore>) -> RegistryResult<HttpResponse> {
    // Sampled from the store actually serving this app.
    RISKS_STORED.set(store.len() as i64);
    let body = metrics::render().map_err(|e| RegistryError::Metrics(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== List Risks =====
pub async fn list_risks(store: web::Data<RiskStore>) -> HttpResponse {
    let risks = store.list_all();
    debug!("Listing {} risks", risks.len());

    HttpResponse::Ok().json(risks)
}

// ===== Get Risk =====
pub async fn get_risk(
    path: web::Path<String>,
    store: web::Data<RiskStore>,
) -> RegistryResult<HttpResponse> {
    let raw_id = path.into_inner();

    let id = Uuid::parse_str(&raw_id).map_err(|_| {
        RISK_LOOKUPS.with_label_values(&["invalid_id"]).inc();
        debug!("Rejected malformed risk id {:?}", raw_id);
        RegistryError::InvalidId
    })?;

    let risk = store.get(&id).ok_or_else(|| {
        RISK_LOOKUPS.with_label_values(&["not_found"]).inc();
        debug!(risk_id = %id, "Risk not found");
        RegistryError::NotFound
    })?;

    RISK_LOOKUPS.with_label_values(&["found"]).inc();
    Ok(HttpResponse::Ok().json(risk))
}

// ===== Create Risk =====
pub async fn create_risk(
    req: web::Json<CreateRisk>,
    store: web::Data<RiskStore>,
) -> RegistryResult<HttpResponse> {
    let risk = Risk::try_from(req.into_inner()).map_err(|e| {
        RISK_VALIDATION_FAILURES.with_label_values(&[e.reason()]).inc();
        warn!("Rejected risk: {}", e);
        e
    })?;

    store.put(risk.id, risk.clone());
    RISKS_CREATED.inc();

    info!(risk_id = %risk.id, state = %risk.state, "Risk created");

    Ok(HttpResponse::Created().json(risk))
}

// ===== Fallback =====
pub async fn route_not_found() -> HttpResponse {
    RegistryError::RouteNotFound.error_response()
}

/// Bodies are decoded as JSON whatever their Content-Type says.
/// Body decoding failures answer with the same `{"error": ...}` shape as
/// every other failure instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            let err = RegistryError::from(err);
            RISK_VALIDATION_FAILURES
                .with_label_values(&[err.reason()])
                .inc();
            warn!("Rejected request body: {}", err);
            err.into()
        })
}

// ===== Configure Routes =====
//
// Trailing slashes are trimmed by `NormalizePath` before routing, so only the
// bare paths are registered here. Known paths hit with an unsupported method
// fall through to the same 404 as unknown paths.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/v1")
                .service(
                    web::resource("/risks")
                        .route(web::get().to(list_risks))
                        .route(web::post().to(create_risk))
                        .default_service(web::to(route_not_found)),
                )
                .service(
                    web::resource("/risks/{id}")
                        .route(web::get().to(get_risk))
                        .default_service(web::to(route_not_found)),
                ),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(health_check))
                .default_service(web::to(route_not_found)),
        )
        .service(
            web::resource("/metrics")
                .route(web::get().to(metrics_endpoint))
                .default_service(web::to(route_not_found)),
        )
        .default_service(web::to(route_not_found));
}
