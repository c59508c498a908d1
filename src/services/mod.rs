// ============================================================================
// Collaborator Services
// ============================================================================
//
// Leaf data-mutation services the order reactions call. Each is a trait with
// a Postgres implementation; tests swap in recording fakes.
//
// ============================================================================

mod inventory;
mod loyalty;
mod notification;
mod users;

pub use inventory::{InventoryService, PgInventoryService};
pub use loyalty::{LoyaltyService, PgLoyaltyService};
pub use notification::{NotificationService, PgNotificationService};
pub use users::{PgUserDirectory, UserDirectory};
