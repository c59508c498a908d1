use async_trait::async_trait;

use crate::error::AppError;
use super::event::DomainEvent;

// ============================================================================
// Reaction - side-effecting handler bound to one event type
// ============================================================================

/// A handler that performs side effects for an event.
///
/// Reactions return nothing to the publisher except success or failure; a
/// failure stops the remaining reactions for that publish call.
#[async_trait]
pub trait Reaction<E: DomainEvent>: Send + Sync {
    /// Stable name used in logs and metrics
    fn name(&self) -> &'static str;

    async fn react(&self, event: &E) -> Result<(), AppError>;
}
