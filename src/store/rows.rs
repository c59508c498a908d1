use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::order::{Order, OrderLine, OrderStatus, PaymentMethod};
use crate::domain::{CustomerSummary, DeliveryZone, Money, Product, ProductCategory};
use crate::error::AppError;

// ============================================================================
// Row Mapping - Postgres rows -> domain values
// ============================================================================
//
// Enums are stored as TEXT, money as BIGINT centavos. A value the domain
// does not recognise is a data error, reported as Internal.
//
// ============================================================================

#[derive(Debug, FromRow)]
pub(crate) struct OrderHeaderRow {
    pub id: i64,
    pub customer_id: i64,
    pub delivery_zone_id: i64,
    pub delivery_address: String,
    pub total_amount_cents: i64,
    pub status: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub zone_name: String,
    pub zone_delivery_fee_cents: i64,
}

impl OrderHeaderRow {
    pub fn into_parts(self) -> Result<(Order, CustomerSummary, DeliveryZone), AppError> {
        let status: OrderStatus = self.status.parse().map_err(|e| corrupt("orders.status", e))?;
        let payment_method: PaymentMethod = self
            .payment_method
            .parse()
            .map_err(|e| corrupt("orders.payment_method", e))?;

        let order = Order {
            id: self.id,
            customer_id: self.customer_id,
            delivery_zone_id: self.delivery_zone_id,
            delivery_address: self.delivery_address,
            total_amount: Money::from_cents(self.total_amount_cents),
            status,
            payment_method,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        let customer = CustomerSummary {
            id: self.customer_id,
            name: self.customer_name,
            email: self.customer_email,
            phone: self.customer_phone,
        };

        let zone = DeliveryZone {
            id: self.delivery_zone_id,
            name: self.zone_name,
            delivery_fee: Money::from_cents(self.zone_delivery_fee_cents),
        };

        Ok((order, customer, zone))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock_quantity: i32,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: ProductCategory = row.category.parse().map_err(|e| corrupt("products.category", e))?;

        Ok(Product {
            id: row.id,
            name: row.name,
            category,
            price: Money::from_cents(row.price_cents),
            stock_quantity: row.stock_quantity,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderLineRow {
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock_quantity: i32,
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = AppError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        let product = Product::try_from(ProductRow {
            id: row.product_id,
            name: row.product_name,
            category: row.category,
            price_cents: row.price_cents,
            stock_quantity: row.stock_quantity,
        })?;

        Ok(OrderLine {
            product,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
        })
    }
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("unexpected value in {}: {}", column, err))
}
