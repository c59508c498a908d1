use serde::{Deserialize, Serialize};

use crate::event_bus::DomainEvent;
use super::value_objects::{OrderDetails, OrderStatus};

// ============================================================================
// Order Events - published after the order's own write has committed
// ============================================================================

/// A new order was placed. Carries the hydrated order (customer, items,
/// products, delivery zone).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewOrderEvent {
    pub order: OrderDetails,
}

impl DomainEvent for NewOrderEvent {
    fn event_type() -> &'static str { "order.placed" }

    fn aggregate_id(&self) -> i64 {
        self.order.id()
    }
}

/// An order's status changed. `order` is the snapshot after the change.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderStatusEvent {
    pub order: OrderDetails,
    pub previous_status: OrderStatus,
}

impl OrderStatusEvent {
    pub fn is_delivery(&self) -> bool {
        self.order.status() == OrderStatus::Delivered
    }
}

impl DomainEvent for OrderStatusEvent {
    fn event_type() -> &'static str { "order.status_changed" }

    fn aggregate_id(&self) -> i64 {
        self.order.id()
    }
}
