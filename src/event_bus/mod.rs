// ============================================================================
// In-process Event Bus
// ============================================================================
//
// Explicit publish/subscribe registry: event-type tag -> ordered reactions.
// Populated once at start-up, read-only afterwards, dispatched inline on the
// publishing task.
//
// ============================================================================

mod core;
mod registry;

pub use self::core::*;
pub use registry::EventRegistry;
