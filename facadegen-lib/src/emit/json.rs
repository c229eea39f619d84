use super::idents::snake_ident;
use crate::Result;
use crate::compiler::{FacadeDefinition, ResolvedMetric};
use crate::decl::BucketSpec;
use core::fmt::Write;
use serde_json::json;

/// Emit a machine-readable description of a set of facades
pub fn generate<W: Write>(facades: &[FacadeDefinition], writer: &mut W) -> Result<()> {
    let facade_data: Vec<_> = facades
        .iter()
        .map(|facade| {
            json!({
                "namespace": facade.namespace,
                "type_name": facade.type_name,
                "metrics": facade.metrics.iter().map(metric_to_json).collect::<Vec<_>>(),
            })
        })
        .collect();

    let output = json!({
        "facades": facade_data
    });

    writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn metric_to_json(metric: &ResolvedMetric) -> serde_json::Value {
    json!({
        "name": metric.prom_name,
        "type": metric.metric_type,
        "help": metric.help,
        "labels": metric.labels,
        "accessor": snake_ident(&metric.accessor_name).to_string(),
        "field": snake_ident(&metric.field_name).to_string(),
        "buckets": metric.buckets.as_ref().map(buckets_to_json),
    })
}

fn buckets_to_json(spec: &BucketSpec) -> serde_json::Value {
    let params = match spec {
        BucketSpec::Exponential { start, factor, count } => json!({ "start": start, "factor": factor, "count": count }),
        BucketSpec::Linear { start, width, count } => json!({ "start": start, "width": width, "count": count }),
        BucketSpec::Explicit { .. } | BucketSpec::Default => serde_json::Value::Null,
    };

    json!({
        "kind": spec.kind().to_string(),
        "params": params,
        "bounds": spec.bounds(),
    })
}
