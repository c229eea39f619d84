//! Declarative metric manifests
//!
//! A manifest lists metric declarations along with code generation options. It is the
//! input to both the build-script driver and the command-line tool.

mod manifest_file;
mod metric_entry;

pub use manifest_file::{DEFAULT_MANIFEST_TOML, MANIFEST_CANDIDATES, Manifest, ManifestFormat, ManifestOptions};
pub use metric_entry::{ExponentialBuckets, LinearBuckets, MetricEntry};
