// ============================================================================
// Domain Event Trait
// ============================================================================

/// All events published through the registry implement this trait.
///
/// `event_type()` is the registry key: every reaction subscribed under the
/// same tag receives the event.
pub trait DomainEvent: Send + Sync + 'static {
    fn event_type() -> &'static str where Self: Sized;

    /// Id of the entity the event is about (used for log correlation)
    fn aggregate_id(&self) -> i64;
}
