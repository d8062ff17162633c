//! Per-adapter status, score, history, and force-check endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::BridgeError;
use actix_web::{web, HttpResponse, Result as ActixResult};
use tracing::{debug, warn};

/// Configure adapter routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/adapters")
            .route("", web::get().to(list_adapters))
            .route("/{id}", web::get().to(get_adapter))
            .route("/{id}/score", web::get().to(get_score))
            .route("/{id}/history", web::get().to(get_history))
            .route("/{id}/check", web::post().to(force_check)),
    );
}

/// Current status of every monitored adapter
async fn list_adapters(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let statuses = state.system.statuses();
    Ok(HttpResponse::Ok().json(ApiResponse::success(statuses)))
}

/// Current status of one adapter
async fn get_adapter(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let adapter_id = path.into_inner();
    match state.system.status(&adapter_id) {
        Some(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error(format!(
            "adapter {} is not monitored",
            adapter_id
        )))),
    }
}

/// Freshly computed score breakdown
async fn get_score(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let adapter_id = path.into_inner();
    match state.system.score(&adapter_id).await {
        Some(score) => Ok(HttpResponse::Ok().json(ApiResponse::success(score))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error(format!(
            "adapter {} is not monitored",
            adapter_id
        )))),
    }
}

/// Retained score history
async fn get_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let adapter_id = path.into_inner();
    let history = state.system.history(&adapter_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(history)))
}

/// Run one adapter's check immediately and return the raw result
async fn force_check(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let adapter_id = path.into_inner();
    debug!(adapter_id = %adapter_id, "force check requested");

    match state.system.force_check(&adapter_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(BridgeError::NotFound(what)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error(format!("{} is not configured", what)))),
        Err(e) => {
            warn!(adapter_id = %adapter_id, "force check failed: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::error("check could not be run".to_string())))
        }
    }
}
