use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;

use crate::actors::{ComponentHealth, HealthCheckable, HealthStatus};
use crate::error::AppError;
use crate::metrics::Metrics;
use crate::utils::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState};
use super::realtime::{BroadcastMessage, RealtimeBroadcaster};

pub struct RedisBroadcaster {
    connection: ConnectionManager,
    circuit_breaker: CircuitBreaker,
    metrics: Option<Arc<Metrics>>,
}

impl RedisBroadcaster {
    pub async fn connect(url: &str, breaker: CircuitBreakerConfig) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!(url = %url, "Connected to Redis for realtime broadcasts");

        Ok(Self {
            connection,
            circuit_breaker: CircuitBreaker::new("redis", breaker),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state().await
    }
}

#[async_trait]
impl RealtimeBroadcaster for RedisBroadcaster {
    async fn broadcast(&self, message: &BroadcastMessage) -> Result<(), AppError> {
        let payload = message.to_payload()?;
        let mut connection = self.connection.clone();

        // Fails fast while the breaker is open
        let result = self
            .circuit_breaker
            .call(async {
                let receivers: i64 = connection.publish(&message.channel, &payload).await?;
                Ok::<i64, redis::RedisError>(receivers)
            })
            .await;

        if let Some(metrics) = &self.metrics {
            metrics.circuit_breaker_state.set(self.circuit_state().await.as_gauge());
        }

        match result {
            Ok(receivers) => {
                tracing::debug!(
                    channel = %message.channel,
                    event = %message.event,
                    receivers,
                    "Published realtime message"
                );
                Ok(())
            }
            Err(CircuitBreakerError::CircuitOpen) => {
                tracing::warn!(channel = %message.channel, "Circuit breaker open - Redis unavailable");
                Err(AppError::Transport("circuit breaker open for Redis".to_string()))
            }
            Err(CircuitBreakerError::OperationFailed(e)) => {
                tracing::error!(error = %e, channel = %message.channel, "Failed to publish to Redis");
                Err(AppError::Transport(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl HealthCheckable for RedisBroadcaster {
    async fn check_health(&self) -> ComponentHealth {
        let status = match self.circuit_state().await {
            CircuitState::Closed => HealthStatus::Healthy,
            CircuitState::HalfOpen => HealthStatus::Degraded("Circuit breaker half-open".to_string()),
            CircuitState::Open => HealthStatus::Unhealthy("Circuit breaker open".to_string()),
        };

        ComponentHealth::new(self.component_name(), status)
    }

    fn component_name(&self) -> &str {
        "redis"
    }
}
