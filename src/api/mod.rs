// ============================================================================
// HTTP API
// ============================================================================
//
// Routes:
//   POST  /orders              - place an order (201)
//   GET   /orders/{id}         - hydrated order
//   PATCH /orders/{id}/status  - staff/admin only
//   GET   /health              - 503 when any component is unhealthy
//   GET   /metrics             - Prometheus text format
//
// ============================================================================

mod auth;
mod error;
mod handlers;

use actix_web::web;
use kameo::actor::ActorRef;
use std::sync::Arc;

use crate::actors::HealthMonitorActor;
use crate::domain::order::OrderCommandHandler;
use crate::metrics::Metrics;
use crate::services::UserDirectory;

pub use auth::USER_ID_HEADER;

/// Shared handler state, cloned into every worker
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderCommandHandler>,
    pub users: Arc<dyn UserDirectory>,
    pub metrics: Arc<Metrics>,
    pub health: Option<ActorRef<HealthMonitorActor>>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::post().to(handlers::place_order))
        .route("/orders/{id}", web::get().to(handlers::get_order))
        .route("/orders/{id}/status", web::patch().to(handlers::update_status))
        .route("/health", web::get().to(handlers::health))
        .route("/metrics", web::get().to(handlers::metrics));
}
