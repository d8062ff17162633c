//! Severity-sorted alert listing

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{web, HttpResponse, Result as ActixResult};
use tracing::debug;

/// Configure alert routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/alerts", web::get().to(list_alerts));
}

/// Current alerts across all adapters, most severe first
async fn list_alerts(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("alert scan requested");
    let alerts = state.system.alerts().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(alerts)))
}
