//! HTTP server exposing the read-only dashboard surface

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::monitoring::MonitoringSystem;
use crate::utils::error::Result;
use actix_web::{web, App, HttpServer};
use state::AppState;
use std::sync::Arc;
use tracing::info;

/// Run the HTTP server until shutdown
pub async fn run(config: Arc<Config>, system: Arc<MonitoringSystem>) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let state = AppState::new(config, system);

    info!(host = %host, port, "starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
