//! Metrics facades generated from `metrics.toml`
//!
//! - [`sample::Metrics`]: request-level metrics
//! - [`sample::storage::Metrics`]: storage metrics

include!(concat!(env!("OUT_DIR"), "/metrics.rs"));
