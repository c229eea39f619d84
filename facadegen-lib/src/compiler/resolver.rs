use super::ResolvedMetric;
use super::canonicalize::canonicalize;
use crate::decl::{BucketKind, BucketSpec, DEFAULT_HELP, MetricDeclaration};

/// A declaration paired with everything derived from it
#[derive(Debug, Clone)]
pub struct Descriptor<'a> {
    pub declaration: &'a MetricDeclaration,
    pub resolved: ResolvedMetric,
}

/// Determine the exported metric name
///
/// An explicit, non-empty name is canonicalized; otherwise the declaring symbol's name is
/// used verbatim.
#[must_use]
pub fn resolve_name(declaration: &MetricDeclaration) -> String {
    match declaration.raw_name.as_deref() {
        Some(name) if !name.is_empty() => canonicalize(name),
        _ => declaration.source_identifier.clone(),
    }
}

/// Determine the bucket strategy to apply
///
/// Histograms take the highest-precedence annotation present (explicit, then exponential,
/// then linear) and fall back to the default ladder. Every other type gets `None`,
/// whatever it was annotated with.
#[must_use]
pub fn resolve_buckets(declaration: &MetricDeclaration) -> Option<BucketSpec> {
    if !declaration.metric_type.is_histogram() {
        return None;
    }

    declaration
        .bucket_specs
        .iter()
        .filter(|spec| spec.kind() != BucketKind::Default)
        .min_by_key(|spec| spec.kind())
        .cloned()
        .or(Some(BucketSpec::Default))
}

#[must_use]
pub fn resolve(declaration: &MetricDeclaration) -> Descriptor<'_> {
    let resolved = ResolvedMetric {
        prom_name: resolve_name(declaration),
        labels: declaration.raw_labels.iter().map(|label| canonicalize(label)).collect(),
        metric_type: declaration.metric_type,
        help: if declaration.help.trim().is_empty() {
            DEFAULT_HELP.to_string()
        } else {
            declaration.help.clone()
        },
        buckets: resolve_buckets(declaration),
        accessor_name: declaration.source_identifier.clone(),
        field_name: format!("{}{}", declaration.source_identifier, declaration.metric_type),
        namespace: declaration.namespace.clone(),
        site: declaration.site(),
    };

    Descriptor { declaration, resolved }
}
