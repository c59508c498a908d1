// ============================================================================
// Actors Module
// ============================================================================
//
// Actor-based infrastructure for background concerns.
//
// Structure:
// - core/           - Health abstractions (HealthStatus, HealthCheckable)
// - infrastructure/ - Health monitor actor and its probes
//
// Note: the order cascade does NOT run on actors. Reactions execute inline
//       on the request that published the event.
//
// ============================================================================

// Private module declarations
mod core;
mod infrastructure;

pub use self::core::{ComponentHealth, HealthCheckable, HealthStatus};
pub use infrastructure::{DatabaseProbe, GetSystemHealth, HealthMonitorActor};
