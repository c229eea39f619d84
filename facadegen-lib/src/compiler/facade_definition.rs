use super::ResolvedMetric;

/// Name of the generated type in every namespace
pub const FACADE_TYPE_NAME: &str = "Metrics";

/// Everything a backend needs to emit one facade
#[derive(Debug, Clone, PartialEq)]
pub struct FacadeDefinition {
    pub namespace: String,
    pub type_name: &'static str,

    /// Never empty, in declaration order
    pub metrics: Vec<ResolvedMetric>,
}

impl FacadeDefinition {
    #[must_use]
    pub const fn new(namespace: String, metrics: Vec<ResolvedMetric>) -> Self {
        Self {
            namespace,
            type_name: FACADE_TYPE_NAME,
            metrics,
        }
    }

    /// Namespace path split into its `::`-separated segments
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace.split("::")
    }
}
