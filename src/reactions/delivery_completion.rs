use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::loyalty::points_for_quantity;
use crate::domain::order::{OrderDetails, OrderStatusEvent};
use crate::domain::{NewNotification, NotificationKind};
use crate::error::AppError;
use crate::event_bus::Reaction;
use crate::services::{InventoryService, LoyaltyService, NotificationService};

// ============================================================================
// Delivery Completion Reaction - the delivered-order cascade
// ============================================================================
//
// Runs only when the order's current status is `delivered`:
//
//   1. deduct stock, one call per line item
//   2. award loyalty points for water quantities (skipped when zero)
//   3. notify the customer
//
// A failing step returns its error; later steps do not run and earlier
// ones stay applied. Redelivering the same event repeats the cascade.
//
// ============================================================================

pub const DELIVERED_TITLE: &str = "Order Delivered";

pub struct DeliveryCompletionReaction {
    inventory: Arc<dyn InventoryService>,
    loyalty: Arc<dyn LoyaltyService>,
    notifications: Arc<dyn NotificationService>,
}

impl DeliveryCompletionReaction {
    pub fn new(
        inventory: Arc<dyn InventoryService>,
        loyalty: Arc<dyn LoyaltyService>,
        notifications: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            inventory,
            loyalty,
            notifications,
        }
    }

    async fn deduct_inventory(&self, order: &OrderDetails) -> Result<(), AppError> {
        let reason = format!("Order #{} delivered", order.id());

        for line in &order.items {
            let remaining = self
                .inventory
                .deduct_stock(line.product.id, line.quantity, &reason)
                .await?;

            tracing::debug!(
                order_id = order.id(),
                product_id = line.product.id,
                quantity = line.quantity,
                remaining,
                "Stock deducted"
            );
        }

        Ok(())
    }

    async fn award_loyalty(&self, order: &OrderDetails) -> Result<(), AppError> {
        let points = points_for_quantity(order.loyalty_eligible_quantity());
        if points <= 0 {
            tracing::debug!(order_id = order.id(), "No loyalty-eligible items, no points awarded");
            return Ok(());
        }

        let balance = self
            .loyalty
            .award_points(
                order.customer.id,
                points,
                &format!("Points earned from order #{}", order.id()),
            )
            .await?;

        tracing::info!(
            order_id = order.id(),
            customer_id = order.customer.id,
            points,
            balance,
            "Loyalty points awarded"
        );
        Ok(())
    }

    async fn notify_customer(&self, order: &OrderDetails) -> Result<(), AppError> {
        self.notifications
            .notify_user(
                order.customer.id,
                NewNotification::new(
                    DELIVERED_TITLE,
                    format!("Your order #{} has been delivered. Thank you!", order.id()),
                    NotificationKind::OrderDelivered,
                    order.id(),
                ),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Reaction<OrderStatusEvent> for DeliveryCompletionReaction {
    fn name(&self) -> &'static str {
        "delivery_completion"
    }

    async fn react(&self, event: &OrderStatusEvent) -> Result<(), AppError> {
        if !event.is_delivery() {
            return Ok(());
        }

        let order = &event.order;
        tracing::info!(order_id = order.id(), items = order.item_count(), "🚚 Running delivery cascade");

        self.deduct_inventory(order).await?;
        self.award_loyalty(order).await?;
        self.notify_customer(order).await?;

        tracing::info!(order_id = order.id(), "✅ Delivery cascade complete");
        Ok(())
    }
}
