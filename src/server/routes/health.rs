//! Liveness and version endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{web, HttpResponse, Result as ActixResult};
use std::borrow::Cow;
use tracing::debug;

/// Configure liveness routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/version", web::get().to(version_info));
}

/// Basic liveness check
///
/// Used by load balancers; reports the engine itself, not the adapters.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("health check requested");

    let status = ServiceHealth {
        status: Cow::Borrowed("healthy"),
        monitoring_active: state.system.is_active(),
        monitored_adapters: state.system.statuses().len(),
        uptime_seconds: state.system.uptime().as_secs(),
        timestamp: chrono::Utc::now(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

/// Version information
async fn version_info() -> HttpResponse {
    let version = VersionInfo {
        name: Cow::Borrowed(env!("CARGO_PKG_NAME")),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    };
    HttpResponse::Ok().json(ApiResponse::success(version))
}

/// Service liveness summary
#[derive(Debug, Clone, serde::Serialize)]
struct ServiceHealth {
    status: Cow<'static, str>,
    monitoring_active: bool,
    monitored_adapters: usize,
    uptime_seconds: u64,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Version information
#[derive(Debug, Clone, serde::Serialize)]
struct VersionInfo {
    name: Cow<'static, str>,
    version: Cow<'static, str>,
}
