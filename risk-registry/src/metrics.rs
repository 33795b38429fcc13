use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref RISKS_CREATED: IntCounter = IntCounter::new(
        "risks_created_total",
        "Total risks created"
    ).expect("metric can be created");

    pub static ref RISKS_STORED: IntGauge = IntGauge::new(
        "risks_stored",
        "Number of risks currently held in memory"
    ).expect("metric can be created");

    pub static ref RISK_VALIDATION_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("risk_validation_failures_total", "Rejected create requests"),
        &["reason"]
    ).expect("metric can be created");

    pub static ref RISK_LOOKUPS: IntCounterVec = IntCounterVec::new(
        Opts::new("risk_lookups_total", "Single risk lookups by outcome"),
        &["outcome"]
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(RISKS_CREATED.clone()))?;
    registry.register(Box::new(RISKS_STORED.clone()))?;
    registry.register(Box::new(RISK_VALIDATION_FAILURES.clone()))?;
    registry.register(Box::new(RISK_LOOKUPS.clone()))?;

    Ok(())
}

/// Render the default registry in Prometheus text format
pub fn render() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
