// ============================================================================
// Order Domain
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderItem, OrderStatus, OrderDetails, ...)
// - Events (NewOrderEvent, OrderStatusEvent)
// - Commands (PlaceOrder, UpdateOrderStatus)
// - Errors (OrderError enum)
// - Command Handler (OrderCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use command_handler::*;
