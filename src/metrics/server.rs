use prometheus::{Encoder, Registry, TextEncoder};

/// Encode every registered metric in the Prometheus text format
pub fn render_metrics(registry: &Registry) -> Result<Vec<u8>, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;

    Ok(buffer)
}
