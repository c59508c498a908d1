use actix_web::{web, App, HttpServer};
use kameo::Actor;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actors;
mod api;
mod config;
mod domain;
mod error;
mod event_bus;
mod messaging;
mod metrics;
mod reactions;
mod services;
mod store;
mod utils;

#[cfg(test)]
mod testing;

use actors::{DatabaseProbe, HealthCheckable, HealthMonitorActor};
use crate::config::AppConfig;
use domain::order::{NewOrderEvent, OrderCommandHandler, OrderStatusEvent};
use event_bus::EventRegistry;
use messaging::{LogBroadcaster, RealtimeBroadcaster, RedisBroadcaster};
use reactions::{BroadcastNewOrder, BroadcastStatusUpdate, DeliveryCompletionReaction, OrderPlacementReaction};
use services::{PgInventoryService, PgLoyaltyService, PgNotificationService, PgUserDirectory, UserDirectory};
use store::PgOrderRepository;
use utils::retry_with_backoff;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize structured logging with environment-based filtering
    // RUST_LOG wins over the configured filter, e.g. RUST_LOG=debug
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter))
        )
        .init();

    tracing::info!("🚀 Starting water delivery order service");

    // === 1. Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created");

    // === 2. Postgres pool (retried while the database comes up) ===
    let retry = config.startup_retry();
    let database_url = config.database.url.as_str();
    let max_connections = config.database.max_connections;

    let pool = retry_with_backoff("postgres_connect", &retry, move |_| {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
    })
    .await
    .into_result()?;
    tracing::info!(max_connections, "✅ Connected to Postgres");

    // === 3. Realtime transport ===
    let mut probes: Vec<Arc<dyn HealthCheckable>> = vec![Arc::new(DatabaseProbe::new(pool.clone()))];

    let broadcaster: Arc<dyn RealtimeBroadcaster> = if config.redis.enabled {
        let redis_url = config.redis.url.as_str();
        let breaker = config.redis.circuit_breaker();

        let redis = retry_with_backoff("redis_connect", &retry, move |_| {
            RedisBroadcaster::connect(redis_url, breaker.clone())
        })
        .await
        .into_result()?;

        let redis = Arc::new(redis.with_metrics(metrics.clone()));
        probes.push(redis.clone());
        redis
    } else {
        tracing::warn!("Redis disabled, realtime messages will only be logged");
        Arc::new(LogBroadcaster)
    };

    // === 4. Services and event registry ===
    let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool.clone()));
    let notifications = Arc::new(PgNotificationService::new(pool.clone(), users.clone()));
    let inventory = Arc::new(PgInventoryService::new(pool.clone()));
    let loyalty = Arc::new(PgLoyaltyService::new(pool.clone()));

    let events = EventRegistry::builder()
        .with_metrics(metrics.clone())
        .subscribe::<NewOrderEvent, _>(OrderPlacementReaction::new(notifications.clone()))
        .subscribe::<NewOrderEvent, _>(BroadcastNewOrder::new(
            broadcaster.clone(),
            config.realtime.clone(),
            Some(metrics.clone()),
        ))
        .subscribe::<OrderStatusEvent, _>(DeliveryCompletionReaction::new(inventory, loyalty, notifications))
        .subscribe::<OrderStatusEvent, _>(BroadcastStatusUpdate::new(
            broadcaster,
            config.realtime.clone(),
            Some(metrics.clone()),
        ))
        .build();

    let orders = Arc::new(OrderCommandHandler::new(
        Arc::new(PgOrderRepository::new(pool.clone())),
        Arc::new(events),
    ));

    // === 5. Health monitor ===
    let health = HealthMonitorActor::spawn(HealthMonitorActor::new(
        probes,
        Duration::from_secs(config.health.probe_interval_secs),
    ));

    // === 6. HTTP server ===
    let state = api::AppState {
        orders,
        users,
        metrics,
        health: Some(health),
    };

    let bind = (config.server.host.clone(), config.server.port);
    tracing::info!("🌐 Listening on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}
