use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;

// ============================================================================
// Inventory Service
// ============================================================================
//
// deduct_stock decrements with a single UPDATE (no read-then-write), then
// records an inventory transaction in the same database transaction. Stock
// is allowed to go negative; that case is logged.
//
// ============================================================================

#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Decrement stock by `quantity`; returns the new stock level
    async fn deduct_stock(&self, product_id: i64, quantity: i32, reason: &str) -> Result<i32, AppError>;
}

pub struct PgInventoryService {
    pool: PgPool,
}

impl PgInventoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryService for PgInventoryService {
    async fn deduct_stock(&self, product_id: i64, quantity: i32, reason: &str) -> Result<i32, AppError> {
        let mut tx = self.pool.begin().await?;

        let remaining: Option<(i32,)> = sqlx::query_as(
            "UPDATE products
             SET stock_quantity = stock_quantity - $2, updated_at = NOW()
             WHERE id = $1
             RETURNING stock_quantity",
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await?;

        let (remaining,) = remaining.ok_or_else(|| AppError::not_found("Product", product_id))?;

        sqlx::query(
            "INSERT INTO inventory_transactions (product_id, quantity_change, reason, created_at)
             VALUES ($1, $2, $3, NOW())",
        )
        .bind(product_id)
        .bind(-quantity)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if remaining < 0 {
            tracing::warn!(product_id, remaining, "Stock went negative after deduction");
        }

        tracing::info!(product_id, quantity, remaining, reason, "Stock deducted");

        Ok(remaining)
    }
}
