use super::{BucketSpec, MetricType};

/// Help text used when a declaration does not provide any
pub const DEFAULT_HELP: &str = "no help set";

/// One metric, as declared at a single site
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDeclaration {
    /// Explicit export name; `None` falls back to `source_identifier`
    pub raw_name: Option<String>,
    pub metric_type: MetricType,
    pub help: String,
    pub raw_labels: Vec<String>,

    /// Every bucket annotation attached to the site
    pub bucket_specs: Vec<BucketSpec>,

    /// Name of the declaring symbol; base for the generated accessor and field names
    pub source_identifier: String,

    /// Owning module path, `::`-separated
    pub namespace: String,
}

impl MetricDeclaration {
    #[must_use]
    pub fn new(namespace: impl Into<String>, source_identifier: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            raw_name: None,
            metric_type,
            help: DEFAULT_HELP.to_string(),
            raw_labels: Vec::new(),
            bucket_specs: Vec::new(),
            source_identifier: source_identifier.into(),
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.raw_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_buckets(mut self, spec: BucketSpec) -> Self {
        self.bucket_specs.push(spec);
        self
    }

    /// `namespace::source_identifier`, used to point diagnostics at the declaring site
    #[must_use]
    pub fn site(&self) -> String {
        format!("{}::{}", self.namespace, self.source_identifier)
    }
}
