// Private module declaration
mod server;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
};

// Re-export for public API
pub use server::render_metrics;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Events published through the registry
// - Reaction failures and latency
// - Realtime broadcasts by outcome
// - Realtime transport circuit breaker state
//
// Scraped via GET /metrics on the API server.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Event Registry Metrics
    pub events_published: IntCounterVec,
    pub reactions_failed: IntCounterVec,
    pub reaction_duration: HistogramVec,

    // Realtime Transport Metrics
    pub realtime_broadcasts: IntCounterVec,
    pub circuit_breaker_state: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let events_published = IntCounterVec::new(
            Opts::new("events_published_total", "Total domain events published"),
            &["event_type"],
        )?;
        registry.register(Box::new(events_published.clone()))?;

        let reactions_failed = IntCounterVec::new(
            Opts::new("reactions_failed_total", "Total reactions that returned an error"),
            &["event_type", "reaction"],
        )?;
        registry.register(Box::new(reactions_failed.clone()))?;

        let reaction_duration = HistogramVec::new(
            HistogramOpts::new("reaction_duration_seconds", "Reaction execution duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["reaction"],
        )?;
        registry.register(Box::new(reaction_duration.clone()))?;

        let realtime_broadcasts = IntCounterVec::new(
            Opts::new("realtime_broadcasts_total", "Realtime broadcasts by outcome"),
            &["event", "outcome"],
        )?;
        registry.register(Box::new(realtime_broadcasts.clone()))?;

        let circuit_breaker_state = IntGauge::new(
            "circuit_breaker_state",
            "Realtime transport circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        Ok(Self {
            registry,
            events_published,
            reactions_failed,
            reaction_duration,
            realtime_broadcasts,
            circuit_breaker_state,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.events_published.with_label_values(&["order.placed"]).inc();

        let families = metrics.registry().gather();
        assert!(!families.is_empty());
    }

    #[test]
    fn test_broadcast_outcomes_are_labelled() {
        let metrics = Metrics::new().unwrap();
        metrics.realtime_broadcasts.with_label_values(&["order.placed", "sent"]).inc();
        metrics.realtime_broadcasts.with_label_values(&["order.placed", "failed"]).inc();
        metrics.realtime_broadcasts.with_label_values(&["order.placed", "failed"]).inc();

        assert_eq!(
            metrics.realtime_broadcasts.with_label_values(&["order.placed", "failed"]).get(),
            2
        );
    }
}
