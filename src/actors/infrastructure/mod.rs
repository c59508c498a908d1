// ============================================================================
// Infrastructure Actors
// ============================================================================
//
// - Health monitoring (actor + probes)
//
// ============================================================================

// Private module declarations
mod database_probe;
mod health_monitor;

// Re-export for public API
pub use database_probe::DatabaseProbe;
pub use health_monitor::{GetSystemHealth, HealthMonitorActor};
