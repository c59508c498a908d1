// ============================================================================
// Order Store - Postgres persistence for orders
// ============================================================================

mod order_repository;
mod rows;

pub use order_repository::{NewOrder, NewOrderLine, OrderRepository, PgOrderRepository};
