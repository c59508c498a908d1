// ============================================================================
// Order Reactions
// ============================================================================
//
// Registered at start-up (see main.rs):
//
//   order.placed         -> OrderPlacementReaction, BroadcastNewOrder
//   order.status_changed -> DeliveryCompletionReaction, BroadcastStatusUpdate
//
// Notification and cascade reactions propagate their errors to the
// publisher. Broadcast reactions never fail the publish.
//
// ============================================================================

mod delivery_completion;
mod order_placement;
mod realtime;

pub use delivery_completion::DeliveryCompletionReaction;
pub use order_placement::OrderPlacementReaction;
pub use realtime::{BroadcastNewOrder, BroadcastStatusUpdate};
