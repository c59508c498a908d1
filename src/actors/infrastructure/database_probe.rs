use async_trait::async_trait;
use sqlx::PgPool;

use crate::actors::core::{ComponentHealth, HealthCheckable, HealthStatus};

/// Round-trips `SELECT 1` through the pool
pub struct DatabaseProbe {
    pool: PgPool,
}

impl DatabaseProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheckable for DatabaseProbe {
    async fn check_health(&self) -> ComponentHealth {
        let status = match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        };

        ComponentHealth::new(self.component_name(), status)
            .with_details(format!("pool size {}, idle {}", self.pool.size(), self.pool.num_idle()))
    }

    fn component_name(&self) -> &str {
        "postgres"
    }
}
