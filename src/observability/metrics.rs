use std::sync::Arc;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Caller metrics
    pub api_calls: IntCounterVec,
    pub api_call_duration: HistogramVec,

    // Token metrics
    pub token_refreshes: IntCounterVec,
    pub token_cache_hits: IntCounter,

    // Domain metrics
    pub restaurants_fetched: IntGauge,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("apiagent".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Caller
            api_calls: IntCounterVec::new(Opts::new("api_calls_total", "Completed API calls by outcome"), &["method", "result"]).unwrap(),
            api_call_duration: HistogramVec::new(HistogramOpts::new("api_call_duration_seconds", "API call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["method"]).unwrap(),

            // Token
            token_refreshes: IntCounterVec::new(Opts::new("token_refreshes_total", "Token refreshes by trigger and result"), &["trigger", "result"]).unwrap(),
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Authorizations served from the cached token").unwrap(),

            // Domain
            restaurants_fetched: IntGauge::new("restaurants_fetched", "Restaurants returned by the last search").unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.api_calls.clone())).unwrap();
        reg.register(Box::new(metrics.api_call_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_refreshes.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.restaurants_fetched.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
