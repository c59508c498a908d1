use chrono::{TimeZone, Utc};

use crate::domain::order::{Order, OrderDetails, OrderLine, OrderStatus, PaymentMethod};
use crate::domain::{CustomerSummary, DeliveryZone, Money, Product, ProductCategory, User, UserRole};

pub fn customer(id: i64, name: &str) -> CustomerSummary {
    CustomerSummary {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: None,
    }
}

pub fn user(id: i64, name: &str, role: UserRole) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role,
    }
}

pub fn water_product(id: i64) -> Product {
    Product {
        id,
        name: format!("5-Gallon Purified Water #{}", id),
        category: ProductCategory::Water,
        price: Money::from_pesos(35),
        stock_quantity: 100,
    }
}

pub fn container_product(id: i64) -> Product {
    Product {
        id,
        name: format!("Slim Container #{}", id),
        category: ProductCategory::Container,
        price: Money::from_pesos(250),
        stock_quantity: 100,
    }
}

pub fn zone() -> DeliveryZone {
    DeliveryZone {
        id: 1,
        name: "Poblacion".to_string(),
        delivery_fee: Money::ZERO,
    }
}

pub fn line(product: Product, quantity: i32) -> OrderLine {
    OrderLine {
        unit_price: product.price,
        product,
        quantity,
    }
}

/// Hydrated order whose total is the sum of its line totals
pub fn order_details(
    id: i64,
    customer: CustomerSummary,
    items: Vec<OrderLine>,
    status: OrderStatus,
) -> OrderDetails {
    let placed_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let zone = zone();

    OrderDetails {
        order: Order {
            id,
            customer_id: customer.id,
            delivery_zone_id: zone.id,
            delivery_address: "12 Rizal St, Poblacion".to_string(),
            total_amount: items.iter().map(OrderLine::line_total).sum(),
            status,
            payment_method: PaymentMethod::CashOnDelivery,
            notes: None,
            created_at: placed_at,
            updated_at: placed_at,
        },
        customer,
        items,
        delivery_zone: zone,
    }
}
