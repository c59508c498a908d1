use serde::Deserialize;

use super::errors::OrderError;
use super::value_objects::{OrderItem, OrderStatus, PaymentMethod};

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub customer_id: i64,
    pub items: Vec<OrderItem>,
    pub delivery_zone_id: i64,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PlaceOrder {
    /// Validate business rules before anything is persisted
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        for item in &self.items {
            if item.quantity <= 0 {
                return Err(OrderError::InvalidQuantity(item.quantity));
            }
        }

        if self.delivery_address.trim().is_empty() {
            return Err(OrderError::EmptyAddress);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(items: Vec<OrderItem>, address: &str) -> PlaceOrder {
        PlaceOrder {
            customer_id: 1,
            items,
            delivery_zone_id: 1,
            delivery_address: address.to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
            notes: None,
        }
    }

    #[test]
    fn test_valid_command_passes() {
        let cmd = command(vec![OrderItem { product_id: 1, quantity: 2 }], "12 Mabini St");
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let cmd = command(vec![], "12 Mabini St");
        assert!(matches!(cmd.validate(), Err(OrderError::EmptyItems)));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let cmd = command(
            vec![
                OrderItem { product_id: 1, quantity: 1 },
                OrderItem { product_id: 2, quantity: 0 },
            ],
            "12 Mabini St",
        );
        assert!(matches!(cmd.validate(), Err(OrderError::InvalidQuantity(0))));
    }

    #[test]
    fn test_blank_address_rejected() {
        let cmd = command(vec![OrderItem { product_id: 1, quantity: 1 }], "   ");
        assert!(matches!(cmd.validate(), Err(OrderError::EmptyAddress)));
    }

    #[test]
    fn test_place_order_deserializes_from_request_body() {
        let cmd: PlaceOrder = serde_json::from_str(
            r#"{
                "customer_id": 9,
                "items": [{"product_id": 3, "quantity": 2}],
                "delivery_zone_id": 1,
                "delivery_address": "Blk 4 Lot 2",
                "payment_method": "gcash"
            }"#,
        )
        .unwrap();

        assert_eq!(cmd.payment_method, PaymentMethod::Gcash);
        assert_eq!(cmd.notes, None);
    }
}
