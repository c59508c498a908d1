use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::domain::order::{OrderDetails, OrderLine, OrderStatus, PaymentMethod};
use crate::domain::{Money, Product};
use crate::error::AppError;
use super::rows::{OrderHeaderRow, OrderLineRow, ProductRow};

// ============================================================================
// Order Repository - Persistence for orders and their line items
// ============================================================================
//
// Responsibilities:
// 1. Price lookup for the products on a new order
// 2. Atomic insert of an order with its line items
// 3. Hydrated load: order + customer + line items/products + delivery zone
// 4. Status update returning the status it replaced
//
// ============================================================================

/// Order header + priced lines, ready to insert
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub delivery_zone_id: i64,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub total_amount: Money,
    pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Money,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Products keyed by id; ids that do not exist are absent from the map
    async fn find_products(&self, product_ids: &[i64]) -> Result<HashMap<i64, Product>, AppError>;

    /// Insert the order and its lines in one transaction; returns the order id
    async fn insert_order(&self, order: NewOrder) -> Result<i64, AppError>;

    async fn load_details(&self, order_id: i64) -> Result<OrderDetails, AppError>;

    /// Set the status and return the status it replaced
    async fn update_status(&self, order_id: i64, status: OrderStatus) -> Result<OrderStatus, AppError>;
}

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_products(&self, product_ids: &[i64]) -> Result<HashMap<i64, Product>, AppError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, category, price_cents, stock_quantity
             FROM products
             WHERE id = ANY($1)",
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Product::try_from(row).map(|product| (product.id, product)))
            .collect()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let (order_id,): (i64,) = sqlx::query_as(
            "INSERT INTO orders (
                customer_id, delivery_zone_id, delivery_address, total_amount_cents,
                status, payment_method, notes, created_at, updated_at
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
             RETURNING id",
        )
        .bind(order.customer_id)
        .bind(order.delivery_zone_id)
        .bind(&order.delivery_address)
        .bind(order.total_amount.cents())
        .bind(OrderStatus::Pending.as_str())
        .bind(order.payment_method.as_str())
        .bind(&order.notes)
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            order_id,
            customer_id = order.customer_id,
            line_count = order.lines.len(),
            total = %order.total_amount,
            "Persisted order"
        );

        Ok(order_id)
    }

    async fn load_details(&self, order_id: i64) -> Result<OrderDetails, AppError> {
        let header: Option<OrderHeaderRow> = sqlx::query_as(
            "SELECT o.id, o.customer_id, o.delivery_zone_id, o.delivery_address,
                    o.total_amount_cents, o.status, o.payment_method, o.notes,
                    o.created_at, o.updated_at,
                    u.name AS customer_name, u.email AS customer_email, u.phone AS customer_phone,
                    z.name AS zone_name, z.delivery_fee_cents AS zone_delivery_fee_cents
             FROM orders o
             JOIN users u ON u.id = o.customer_id
             JOIN delivery_zones z ON z.id = o.delivery_zone_id
             WHERE o.id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        let header = header.ok_or_else(|| AppError::not_found("Order", order_id))?;

        let line_rows: Vec<OrderLineRow> = sqlx::query_as(
            "SELECT i.quantity, i.unit_price_cents,
                    p.id AS product_id, p.name AS product_name, p.category,
                    p.price_cents, p.stock_quantity
             FROM order_items i
             JOIN products p ON p.id = i.product_id
             WHERE i.order_id = $1
             ORDER BY i.id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        let (order, customer, delivery_zone) = header.into_parts()?;
        let items = line_rows
            .into_iter()
            .map(OrderLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(order_id, line_count = items.len(), "Loaded hydrated order");

        Ok(OrderDetails {
            order,
            customer,
            items,
            delivery_zone,
        })
    }

    async fn update_status(&self, order_id: i64, status: OrderStatus) -> Result<OrderStatus, AppError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<(String,)> =
            sqlx::query_as("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (previous,) = previous.ok_or_else(|| AppError::not_found("Order", order_id))?;
        let previous: OrderStatus = previous
            .parse()
            .map_err(|e| AppError::Internal(format!("unexpected value in orders.status: {}", e)))?;

        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(order_id)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id,
            previous_status = %previous,
            new_status = %status,
            "✅ Updated order status"
        );

        Ok(previous)
    }
}
