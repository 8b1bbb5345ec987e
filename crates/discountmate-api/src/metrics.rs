//! Prometheus metrics for the discount service
//!
//! - `dm_requests_total` (counter) - requests by endpoint, method and status
//! - `dm_errors_total` (counter) - simulated failures
//! - `dm_request_duration_seconds` (histogram) - request latency
//!
//! # Example
//!
//! ```rust,no_run
//! use discountmate_api::metrics::ServiceMetrics;
//!
//! let metrics = ServiceMetrics::new().unwrap();
//! metrics.record_request("/recommend", "POST", 200);
//! metrics.observe_latency(0.004);
//! let text = metrics.encode_text().unwrap();
//! ```

use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

const NAMESPACE: &str = "dm";

/// Latency buckets in seconds
pub const LATENCY_BUCKETS: [f64; 7] = [0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0];

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Metrics encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, MetricsError>;

/// Process-wide service metrics, cheap to clone behind an `Arc`
pub struct ServiceMetrics {
    registry: Arc<Registry>,
    requests_total: CounterVec,
    errors_total: Counter,
    request_duration: Histogram,
}

impl ServiceMetrics {
    /// Create the metrics on a fresh registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Register the metrics on an existing registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let requests_total = CounterVec::new(
            Opts::new("requests_total", "Total requests").namespace(NAMESPACE),
            &["endpoint", "method", "status"],
        )?;

        let errors_total = Counter::with_opts(
            Opts::new("errors_total", "Simulated errors").namespace(NAMESPACE),
        )?;

        let request_duration = Histogram::with_opts(
            HistogramOpts::new("request_duration_seconds", "Request latency (s)")
                .namespace(NAMESPACE)
                .buckets(LATENCY_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            errors_total,
            request_duration,
        })
    }

    pub fn record_request(&self, endpoint: &str, method: &str, status: u16) {
        self.requests_total
            .with_label_values(&[endpoint, method, &status.to_string()])
            .inc();
    }

    pub fn observe_latency(&self, seconds: f64) {
        self.request_duration.observe(seconds);
    }

    /// Bump the simulated error counter by one
    pub fn record_simulated_error(&self) {
        self.errors_total.inc();
    }

    pub fn simulated_errors(&self) -> u64 {
        self.errors_total.get() as u64
    }

    /// Requests recorded so far for one label set
    pub fn request_count(&self, endpoint: &str, method: &str, status: u16) -> u64 {
        self.requests_total
            .with_label_values(&[endpoint, method, &status.to_string()])
            .get() as u64
    }

    pub fn latency_samples(&self) -> u64 {
        self.request_duration.get_sample_count()
    }

    /// Start a latency timer that observes on drop
    pub fn start_timer(&self) -> LatencyTimer<'_> {
        LatencyTimer {
            start: Instant::now(),
            metrics: self,
        }
    }

    /// Encode all metrics in the Prometheus text exposition format
    pub fn encode_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    /// Content type of [`encode_text`](Self::encode_text) output
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

/// RAII guard recording request latency
pub struct LatencyTimer<'a> {
    start: Instant,
    metrics: &'a ServiceMetrics,
}

impl LatencyTimer<'_> {
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for LatencyTimer<'_> {
    fn drop(&mut self) {
        self.metrics.observe_latency(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request() {
        let metrics = ServiceMetrics::new().unwrap();
        metrics.record_request("/recommend", "POST", 200);
        metrics.record_request("/recommend", "POST", 200);
        metrics.record_request("/recommend", "POST", 400);

        assert_eq!(metrics.request_count("/recommend", "POST", 200), 2);
        assert_eq!(metrics.request_count("/recommend", "POST", 400), 1);
        assert_eq!(metrics.request_count("/health", "GET", 200), 0);
    }

    #[test]
    fn test_simulated_errors() {
        let metrics = ServiceMetrics::new().unwrap();
        assert_eq!(metrics.simulated_errors(), 0);
        metrics.record_simulated_error();
        assert_eq!(metrics.simulated_errors(), 1);
        metrics.record_simulated_error();
        assert_eq!(metrics.simulated_errors(), 2);
    }

    #[test]
    fn test_latency_timer() {
        let metrics = ServiceMetrics::new().unwrap();
        {
            let timer = metrics.start_timer();
            std::thread::sleep(std::time::Duration::from_millis(5));
            assert!(timer.elapsed_secs() > 0.0);
        }
        assert_eq!(metrics.latency_samples(), 1);
    }

    #[test]
    fn test_encode_text() {
        let metrics = ServiceMetrics::new().unwrap();
        metrics.record_request("/recommend", "POST", 200);
        metrics.record_simulated_error();
        metrics.observe_latency(0.07);

        let text = metrics.encode_text().unwrap();
        assert!(text.contains(
            "dm_requests_total{endpoint=\"/recommend\",method=\"POST\",status=\"200\"} 1"
        ));
        assert!(text.contains("dm_errors_total 1"));
        assert!(text.contains("dm_request_duration_seconds_bucket{le=\"0.1\"} 1"));
        assert!(text.contains("dm_request_duration_seconds_bucket{le=\"0.05\"} 0"));
        assert!(text.contains("dm_request_duration_seconds_count 1"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = Arc::new(Registry::new());
        ServiceMetrics::with_registry(Arc::clone(&registry)).unwrap();
        assert!(ServiceMetrics::with_registry(registry).is_err());
    }

    #[test]
    fn test_content_type() {
        let metrics = ServiceMetrics::new().unwrap();
        assert!(metrics.content_type().starts_with("text/plain"));
    }
}
