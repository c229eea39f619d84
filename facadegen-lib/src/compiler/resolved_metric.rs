use crate::decl::{BucketSpec, MetricType};

/// A declaration after canonicalization and bucket resolution
///
/// `labels` keeps the declared order: it is both the accessor parameter order and the
/// label-name order handed to the client library builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetric {
    pub prom_name: String,
    pub labels: Vec<String>,
    pub metric_type: MetricType,
    pub help: String,

    /// Always `Some` for histograms and `None` for everything else
    pub buckets: Option<BucketSpec>,

    pub accessor_name: String,

    /// `accessor_name` followed by the metric type, so one base name can back several types
    pub field_name: String,

    pub namespace: String,
    pub site: String,
}
