use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub matcher_ticks_total: IntCounter,
    pub assignments_total: IntCounterVec,
    pub matcher_tick_seconds: Histogram,
    pub pending_orders: IntGauge,
    pub available_drivers: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let matcher_ticks_total =
            IntCounter::new("matcher_ticks_total", "Total matcher ticks executed")
                .expect("valid matcher_ticks_total metric");

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Total assignment attempts by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let matcher_tick_seconds = Histogram::with_opts(HistogramOpts::new(
            "matcher_tick_seconds",
            "Duration of a matcher tick in seconds",
        ))
        .expect("valid matcher_tick_seconds metric");

        let pending_orders = IntGauge::new(
            "pending_orders",
            "Pending orders seen at the start of the last tick",
        )
        .expect("valid pending_orders metric");

        let available_drivers = IntGauge::new(
            "available_drivers",
            "Available drivers seen at the start of the last tick",
        )
        .expect("valid available_drivers metric");

        registry
            .register(Box::new(matcher_ticks_total.clone()))
            .expect("register matcher_ticks_total");
        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(matcher_tick_seconds.clone()))
            .expect("register matcher_tick_seconds");
        registry
            .register(Box::new(pending_orders.clone()))
            .expect("register pending_orders");
        registry
            .register(Box::new(available_drivers.clone()))
            .expect("register available_drivers");

        Self {
            registry,
            matcher_ticks_total,
            assignments_total,
            matcher_tick_seconds,
            pending_orders,
            available_drivers,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
