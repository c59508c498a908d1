// ============================================================================
// Domain Layer - Business Types
// ============================================================================
//
// Plain domain values shared by the services, the repository and the event
// reactions:
// - order/        - Order, line items, status, events, commands, handler
// - catalog       - Products, categories, delivery zones
// - customer      - Users, roles, customer summaries
// - notification  - Notification records and kinds
// - loyalty       - Points earned per delivered order
// - money         - Peso amounts stored as centavos
//
// Persistence lives in store/ and services/; nothing here talks to Postgres.
//
// ============================================================================

pub mod catalog;
pub mod customer;
pub mod loyalty;
pub mod money;
pub mod notification;
pub mod order;

pub use catalog::{DeliveryZone, Product, ProductCategory};
pub use customer::{CustomerSummary, User, UserRole};
pub use money::Money;
pub use notification::{NewNotification, Notification, NotificationKind};
