//! HTTP 미들웨어.

pub mod metrics;

pub use metrics::metrics_layer;
