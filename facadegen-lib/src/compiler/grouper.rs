use super::ResolvedMetric;
use std::collections::BTreeMap;

/// Partition metrics by namespace
///
/// Namespaces come out in lexicographic order; within a namespace the input order is kept.
pub fn group(metrics: impl IntoIterator<Item = ResolvedMetric>) -> BTreeMap<String, Vec<ResolvedMetric>> {
    let mut groups: BTreeMap<String, Vec<ResolvedMetric>> = BTreeMap::new();
    for metric in metrics {
        groups.entry(metric.namespace.clone()).or_default().push(metric);
    }

    groups
}
