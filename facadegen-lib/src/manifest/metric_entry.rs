use crate::decl::{BucketSpec, MetricDeclaration, MetricType};
use serde::{Deserialize, Serialize};

/// Namespace used by entries that do not name one
pub const DEFAULT_NAMESPACE: &str = "metrics";

/// One `[[metric]]` entry of a manifest
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricEntry {
    /// `::`-separated module path the metric is exposed from
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Name of the declaring symbol, turned into the accessor name
    pub ident: String,

    #[serde(rename = "type")]
    pub metric_type: MetricType,

    /// Exported name; defaults to `ident`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Explicit bucket upper bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponential_buckets: Option<ExponentialBuckets>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_buckets: Option<LinearBuckets>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExponentialBuckets {
    pub start: f64,
    pub factor: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinearBuckets {
    pub start: f64,
    pub width: f64,
    pub count: usize,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl MetricEntry {
    /// Convert to a declaration, listing bucket annotations in precedence order
    #[must_use]
    pub fn to_declaration(&self) -> MetricDeclaration {
        let mut decl = MetricDeclaration::new(&self.namespace, &self.ident, self.metric_type).with_labels(&self.labels);

        if let Some(name) = &self.name {
            decl = decl.with_name(name);
        }

        if let Some(help) = &self.help {
            decl = decl.with_help(help);
        }

        if let Some(values) = &self.buckets {
            decl = decl.with_buckets(BucketSpec::Explicit { values: values.clone() });
        }

        if let Some(ExponentialBuckets { start, factor, count }) = self.exponential_buckets {
            decl = decl.with_buckets(BucketSpec::Exponential { start, factor, count });
        }

        if let Some(LinearBuckets { start, width, count }) = self.linear_buckets {
            decl = decl.with_buckets(BucketSpec::Linear { start, width, count });
        }

        decl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::DEFAULT_HELP;

    #[test]
    fn test_minimal_entry() {
        let entry: MetricEntry = toml::from_str(
            r#"
            ident = "Error"
            type = "counter"
            "#,
        )
        .unwrap();

        let decl = entry.to_declaration();
        assert_eq!(decl.namespace, DEFAULT_NAMESPACE);
        assert_eq!(decl.source_identifier, "Error");
        assert_eq!(decl.raw_name, None);
        assert_eq!(decl.help, DEFAULT_HELP);
        assert!(decl.raw_labels.is_empty());
        assert!(decl.bucket_specs.is_empty());
    }

    #[test]
    fn test_bucket_annotations_keep_precedence_order() {
        let entry: MetricEntry = toml::from_str(
            r#"
            ident = "Timing"
            type = "histogram"
            linear_buckets = { start = 1.0, width = 2.0, count = 3 }
            buckets = [1.0, 2.0]
            exponential_buckets = { start = 1.0, factor = 2.0, count = 3 }
            "#,
        )
        .unwrap();

        let kinds: Vec<_> = entry.to_declaration().bucket_specs.iter().map(BucketSpec::kind).map(|k| k.to_string()).collect();
        assert_eq!(kinds, ["explicit", "exponential", "linear"]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = toml::from_str::<MetricEntry>(
            r#"
            ident = "Error"
            type = "counter"
            label = ["typo"]
            "#,
        );
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_bucket_params_reject_unknown_fields() {
        let result = toml::from_str::<MetricEntry>(
            r#"
            ident = "Timing"
            type = "histogram"
            linear_buckets = { start = 1.0, step = 2.0, count = 3 }
            "#,
        );
        let _ = result.unwrap_err();
    }
}
