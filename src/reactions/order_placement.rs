use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::order::NewOrderEvent;
use crate::domain::{NewNotification, NotificationKind};
use crate::error::AppError;
use crate::event_bus::Reaction;
use crate::services::NotificationService;

pub const NEW_ORDER_TITLE: &str = "New Order Received";

/// Tells every admin that an order came in
pub struct OrderPlacementReaction {
    notifications: Arc<dyn NotificationService>,
}

impl OrderPlacementReaction {
    pub fn new(notifications: Arc<dyn NotificationService>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl Reaction<NewOrderEvent> for OrderPlacementReaction {
    fn name(&self) -> &'static str {
        "order_placement"
    }

    async fn react(&self, event: &NewOrderEvent) -> Result<(), AppError> {
        let order = &event.order;
        let body = format!(
            "Order #{} from {} - Total: {}",
            order.id(),
            order.customer.name,
            order.order.total_amount
        );

        let notified = self
            .notifications
            .notify_admins(NewNotification::new(
                NEW_ORDER_TITLE,
                body,
                NotificationKind::NewOrder,
                order.id(),
            ))
            .await?;

        tracing::info!(order_id = order.id(), admins = notified, "📣 Admins notified of new order");
        Ok(())
    }
}
