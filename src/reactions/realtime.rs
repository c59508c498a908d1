use async_trait::async_trait;
use std::sync::Arc;

use crate::config::RealtimeConfig;
use crate::domain::order::{NewOrderEvent, OrderStatusEvent};
use crate::error::AppError;
use crate::event_bus::Reaction;
use crate::messaging::{BroadcastMessage, RealtimeBroadcaster};
use crate::metrics::Metrics;

// ============================================================================
// Realtime Broadcast Reactions
// ============================================================================
//
// Push order activity to connected clients:
// - order.placed         -> shared staff channel
// - order.status.updated -> per-order channel
//
// Best effort: a transport failure is logged and counted, and the publish
// carries on as if the broadcast had succeeded.
//
// ============================================================================

pub const ORDER_PLACED: &str = "order.placed";
pub const ORDER_STATUS_UPDATED: &str = "order.status.updated";

/// Shared send path for both broadcast reactions
struct Broadcast {
    transport: Arc<dyn RealtimeBroadcaster>,
    metrics: Option<Arc<Metrics>>,
}

impl Broadcast {
    async fn send(&self, message: BroadcastMessage) {
        let outcome = match self.transport.broadcast(&message).await {
            Ok(()) => "sent",
            Err(e) => {
                tracing::warn!(
                    channel = %message.channel,
                    event = %message.event,
                    error = %e,
                    "Realtime broadcast failed, continuing"
                );
                "failed"
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics
                .realtime_broadcasts
                .with_label_values(&[message.event.as_str(), outcome])
                .inc();
        }
    }
}

pub struct BroadcastNewOrder {
    broadcast: Broadcast,
    channels: RealtimeConfig,
}

impl BroadcastNewOrder {
    pub fn new(
        transport: Arc<dyn RealtimeBroadcaster>,
        channels: RealtimeConfig,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            broadcast: Broadcast { transport, metrics },
            channels,
        }
    }
}

#[async_trait]
impl Reaction<NewOrderEvent> for BroadcastNewOrder {
    fn name(&self) -> &'static str {
        "broadcast_new_order"
    }

    async fn react(&self, event: &NewOrderEvent) -> Result<(), AppError> {
        let order = &event.order;
        let message = BroadcastMessage::new(self.channels.staff_channel.as_str(), ORDER_PLACED)
            .field("order_id", order.id())
            .field("customer_name", order.customer.name.as_str())
            .field("address", order.order.delivery_address.as_str())
            .field("total", order.order.total_amount.to_decimal_string())
            .field("item_count", order.item_count());

        self.broadcast.send(message).await;
        Ok(())
    }
}

pub struct BroadcastStatusUpdate {
    broadcast: Broadcast,
    channels: RealtimeConfig,
}

impl BroadcastStatusUpdate {
    pub fn new(
        transport: Arc<dyn RealtimeBroadcaster>,
        channels: RealtimeConfig,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            broadcast: Broadcast { transport, metrics },
            channels,
        }
    }
}

#[async_trait]
impl Reaction<OrderStatusEvent> for BroadcastStatusUpdate {
    fn name(&self) -> &'static str {
        "broadcast_status_update"
    }

    async fn react(&self, event: &OrderStatusEvent) -> Result<(), AppError> {
        let order = &event.order;
        let message = BroadcastMessage::new(self.channels.order_channel(order.id()), ORDER_STATUS_UPDATED)
            .field("order_id", order.id())
            .field("status", order.status().as_str())
            .field("previous_status", event.previous_status.as_str())
            .field("updated_at", order.order.updated_at.to_rfc3339());

        self.broadcast.send(message).await;
        Ok(())
    }
}
