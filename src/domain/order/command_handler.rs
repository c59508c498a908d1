use std::sync::Arc;

use crate::domain::Money;
use crate::error::AppError;
use crate::event_bus::EventRegistry;
use crate::store::{NewOrder, NewOrderLine, OrderRepository};

use super::commands::{PlaceOrder, UpdateOrderStatus};
use super::events::{NewOrderEvent, OrderStatusEvent};
use super::value_objects::OrderDetails;

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Command → Validate → Persist (committed) → Publish Event
//
// The order write commits before any reaction runs. A reaction error is
// returned to the caller, but the order change is not rolled back.
//
// ============================================================================

pub struct OrderCommandHandler {
    repository: Arc<dyn OrderRepository>,
    events: Arc<EventRegistry>,
}

impl OrderCommandHandler {
    pub fn new(repository: Arc<dyn OrderRepository>, events: Arc<EventRegistry>) -> Self {
        Self { repository, events }
    }

    /// Place an order and publish `NewOrderEvent`
    pub async fn place_order(&self, command: PlaceOrder) -> Result<OrderDetails, AppError> {
        command.validate()?;

        let product_ids: Vec<i64> = command.items.iter().map(|item| item.product_id).collect();
        let products = self.repository.find_products(&product_ids).await?;

        let mut lines = Vec::with_capacity(command.items.len());
        for item in &command.items {
            let product = products
                .get(&item.product_id)
                .ok_or_else(|| AppError::not_found("Product", item.product_id))?;

            lines.push(NewOrderLine {
                product_id: product.id,
                quantity: item.quantity,
                unit_price: product.price,
            });
        }

        let total_amount: Money = lines.iter().map(|line| line.unit_price.times(line.quantity)).sum();

        let order_id = self
            .repository
            .insert_order(NewOrder {
                customer_id: command.customer_id,
                delivery_zone_id: command.delivery_zone_id,
                delivery_address: command.delivery_address.trim().to_string(),
                payment_method: command.payment_method,
                notes: command.notes,
                total_amount,
                lines,
            })
            .await?;

        tracing::info!(
            order_id,
            customer_id = command.customer_id,
            total = %total_amount,
            "✅ Order placed"
        );

        let details = self.repository.load_details(order_id).await?;

        let event = NewOrderEvent { order: details };
        if let Err(e) = self.events.publish(&event).await {
            tracing::error!(order_id, error = %e, "Order saved but a placement reaction failed");
            return Err(e);
        }

        Ok(event.order)
    }

    /// Change an order's status; publishes `OrderStatusEvent` only when the
    /// status actually changed.
    pub async fn update_status(
        &self,
        order_id: i64,
        command: UpdateOrderStatus,
    ) -> Result<OrderDetails, AppError> {
        let previous_status = self.repository.update_status(order_id, command.status).await?;
        let details = self.repository.load_details(order_id).await?;

        if previous_status == command.status {
            tracing::debug!(order_id, status = %command.status, "Status unchanged, no event published");
            return Ok(details);
        }

        tracing::info!(
            order_id,
            from = %previous_status,
            to = %command.status,
            "Order status changed"
        );

        let event = OrderStatusEvent {
            order: details,
            previous_status,
        };
        if let Err(e) = self.events.publish(&event).await {
            tracing::error!(order_id, error = %e, "Status saved but a status reaction failed");
            return Err(e);
        }

        Ok(event.order)
    }

    pub async fn get_order(&self, order_id: i64) -> Result<OrderDetails, AppError> {
        self.repository.load_details(order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::domain::order::{OrderError, OrderItem, OrderStatus, PaymentMethod};
    use crate::event_bus::Reaction;
    use crate::reactions::{DeliveryCompletionReaction, OrderPlacementReaction};
    use crate::testing::{
        fixtures, InMemoryOrderRepository, RecordingInventory, RecordingLoyalty, RecordingNotifications,
    };
    use std::sync::Mutex;

    struct Fixture {
        handler: OrderCommandHandler,
        repository: Arc<InMemoryOrderRepository>,
        inventory: Arc<RecordingInventory>,
        loyalty: Arc<RecordingLoyalty>,
        notifications: Arc<RecordingNotifications>,
    }

    fn fixture(first_order_id: i64, admins: Vec<i64>) -> Fixture {
        let repository = Arc::new(
            InMemoryOrderRepository::new(
                vec![fixtures::water_product(1), fixtures::container_product(2)],
                vec![fixtures::customer(5, "Ana Cruz"), fixtures::customer(21, "Ben Santos")],
            )
            .starting_at(first_order_id),
        );
        let inventory = Arc::new(RecordingInventory::default());
        let loyalty = Arc::new(RecordingLoyalty::default());
        let notifications = Arc::new(RecordingNotifications::with_admins(admins));

        let events = EventRegistry::builder()
            .subscribe::<NewOrderEvent, _>(OrderPlacementReaction::new(notifications.clone()))
            .subscribe::<OrderStatusEvent, _>(DeliveryCompletionReaction::new(
                inventory.clone(),
                loyalty.clone(),
                notifications.clone(),
            ))
            .build();

        Fixture {
            handler: OrderCommandHandler::new(repository.clone(), Arc::new(events)),
            repository,
            inventory,
            loyalty,
            notifications,
        }
    }

    fn place(customer_id: i64, items: Vec<(i64, i32)>) -> PlaceOrder {
        PlaceOrder {
            customer_id,
            items: items
                .into_iter()
                .map(|(product_id, quantity)| OrderItem { product_id, quantity })
                .collect(),
            delivery_zone_id: 1,
            delivery_address: "  12 Rizal St, Poblacion ".to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
            notes: None,
        }
    }

    fn status(status: OrderStatus) -> UpdateOrderStatus {
        UpdateOrderStatus { status }
    }

    #[tokio::test]
    async fn test_place_order_computes_total_and_notifies_admins() {
        let f = fixture(7, vec![100]);

        let order = f.handler.place_order(place(21, vec![(1, 2), (2, 1)])).await.unwrap();

        assert_eq!(order.id(), 7);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.order.total_amount, Money::from_pesos(320));
        assert_eq!(order.order.delivery_address, "12 Rizal St, Poblacion");

        let sent = f.notifications.sent_to(100);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "Order #7 from Ben Santos - Total: ₱320.00");
    }

    #[tokio::test]
    async fn test_invalid_order_is_rejected_before_persisting() {
        let f = fixture(1, vec![100]);

        let err = f.handler.place_order(place(5, vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::EmptyItems)));

        let err = f.handler.place_order(place(5, vec![(1, 0)])).await.unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::InvalidQuantity(0))));

        assert_eq!(f.repository.order_count(), 0);
        assert!(f.notifications.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let f = fixture(1, vec![100]);

        let err = f.handler.place_order(place(5, vec![(1, 1), (99, 1)])).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { entity: "Product", ref id } if id == "99"));
        assert_eq!(f.repository.order_count(), 0);
    }

    #[tokio::test]
    async fn test_delivery_runs_cascade_once_per_transition() {
        let f = fixture(42, vec![100, 101]);
        let order = f.handler.place_order(place(5, vec![(1, 3), (2, 2)])).await.unwrap();

        f.handler.update_status(order.id(), status(OrderStatus::OutForDelivery)).await.unwrap();
        let delivered = f.handler.update_status(order.id(), status(OrderStatus::Delivered)).await.unwrap();

        assert_eq!(delivered.status(), OrderStatus::Delivered);
        assert_eq!(f.inventory.deductions().len(), 2);
        assert_eq!(f.loyalty.awards().len(), 1);
        assert_eq!(f.loyalty.awards()[0].points, 3);
        assert_eq!(f.notifications.sent_to(5).len(), 1);

        // Setting the same status again publishes nothing
        f.handler.update_status(order.id(), status(OrderStatus::Delivered)).await.unwrap();
        assert_eq!(f.inventory.deductions().len(), 2);
        assert_eq!(f.loyalty.awards().len(), 1);

        // Admins heard about the placement only
        assert_eq!(f.notifications.sent_to(100).len(), 1);
        assert_eq!(f.notifications.sent_to(101).len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_unknown_order() {
        let f = fixture(1, vec![]);

        let err = f.handler.update_status(404, status(OrderStatus::Confirmed)).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { entity: "Order", .. }));
    }

    struct FailingReaction {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl Reaction<NewOrderEvent> for FailingReaction {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn react(&self, _event: &NewOrderEvent) -> Result<(), AppError> {
            *self.calls.lock().unwrap() += 1;
            Err(AppError::Internal("notification store unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_reaction_failure_keeps_order_committed() {
        let repository = Arc::new(InMemoryOrderRepository::new(
            vec![fixtures::water_product(1)],
            vec![fixtures::customer(5, "Ana Cruz")],
        ));
        let events = EventRegistry::builder()
            .subscribe::<NewOrderEvent, _>(FailingReaction { calls: Mutex::new(0) })
            .build();
        let handler = OrderCommandHandler::new(repository.clone(), Arc::new(events));

        let err = handler.place_order(place(5, vec![(1, 1)])).await.unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(repository.order_count(), 1);
        assert!(handler.get_order(1).await.is_ok());
    }
}
