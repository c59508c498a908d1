use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;

// ============================================================================
// Loyalty Service
// ============================================================================
//
// award_points appends a ledger entry and bumps the cached balance on the
// user row in one transaction, so the cached balance always equals the
// ledger sum.
//
// ============================================================================

#[async_trait]
pub trait LoyaltyService: Send + Sync {
    /// Credit `points`; returns the customer's new balance
    async fn award_points(&self, customer_id: i64, points: i64, reason: &str) -> Result<i64, AppError>;
}

pub struct PgLoyaltyService {
    pool: PgPool,
}

impl PgLoyaltyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoyaltyService for PgLoyaltyService {
    async fn award_points(&self, customer_id: i64, points: i64, reason: &str) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let balance: Option<(i64,)> = sqlx::query_as(
            "UPDATE users
             SET loyalty_points = loyalty_points + $2
             WHERE id = $1 AND role = 'customer'
             RETURNING loyalty_points",
        )
        .bind(customer_id)
        .bind(points)
        .fetch_optional(&mut *tx)
        .await?;

        let (balance,) = balance.ok_or_else(|| AppError::not_found("Customer", customer_id))?;

        sqlx::query(
            "INSERT INTO loyalty_ledger (customer_id, points, reason, created_at)
             VALUES ($1, $2, $3, NOW())",
        )
        .bind(customer_id)
        .bind(points)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(customer_id, points, balance, reason, "Loyalty points awarded");

        Ok(balance)
    }
}
