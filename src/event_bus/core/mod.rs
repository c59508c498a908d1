// ============================================================================
// Event Bus Core - Generic Abstractions
// ============================================================================
//
// No domain-specific code here: the traits work with any event type.
//
// ============================================================================

pub mod event;
pub mod reaction;

pub use event::DomainEvent;
pub use reaction::Reaction;
