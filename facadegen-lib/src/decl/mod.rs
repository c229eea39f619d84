//! Build-time metric declarations
//!
//! This module holds the input side of the compiler: one [`MetricDeclaration`] per
//! declaring site, exactly as the scanning front end extracted it. Nothing here is
//! canonicalized or checked; that is the job of the [`compiler`](crate::compiler).
//!
//! # Implementation Model
//!
//! - [`MetricType`]: the closed set of metric primitives a facade can expose
//! - [`BucketSpec`]: a histogram bucket strategy, either explicit, formulaic, or the
//!   built-in default ladder
//! - [`MetricDeclaration`]: the raw declaration, including every bucket annotation
//!   attached to the site so that conflicting annotations remain observable

mod bucket_spec;
mod metric_declaration;
mod metric_type;

pub use bucket_spec::{BucketKind, BucketSpec, DEFAULT_TIMER_BUCKETS, MAX_BUCKET_COUNT};
pub use metric_declaration::{DEFAULT_HELP, MetricDeclaration};
pub use metric_type::MetricType;
