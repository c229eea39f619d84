//! Turn metric declarations into validated facade definitions.
//!
//! # Implementation Model
//!
//! Compilation runs in three stages over the full declaration set:
//!
//! 1. **Resolution**: each declaration is paired with its derived form (exported name,
//!    canonical labels, accessor and field names, applied bucket strategy).
//! 2. **Validation**: every rule is checked against the whole set and all violations are
//!    collected. Any violation aborts compilation and no facade is produced.
//! 3. **Grouping**: resolved metrics are partitioned by namespace, one facade each.
//!
//! The output depends only on the input order, never on hashing, so identical inputs
//! always yield identical generated code.

mod canonicalize;
mod compile_options;
mod facade_definition;
mod grouper;
mod identifiers;
mod resolved_metric;
mod resolver;
mod validation_error;
mod validator;

pub use canonicalize::canonicalize;
pub use compile_options::{BucketPolicy, CompileOptions};
pub use facade_definition::{FACADE_TYPE_NAME, FacadeDefinition};
pub use identifiers::{escaped_ident, is_raw_keyword, label_param_name};
pub use resolved_metric::ResolvedMetric;
pub use resolver::{Descriptor, resolve, resolve_buckets, resolve_name};
pub use validation_error::{BucketConflict, CompileError, ErrorKind, ValidationError};

use crate::decl::MetricDeclaration;

const LOG_TARGET: &str = "  compiler";

/// Compile a declaration set into one facade definition per namespace
///
/// # Errors
///
/// Returns a [`CompileError`] listing every violation when any declaration is invalid.
pub fn compile(declarations: &[MetricDeclaration], options: &CompileOptions) -> Result<Vec<FacadeDefinition>, CompileError> {
    log::debug!(target: LOG_TARGET, "Resolving {} metric declarations", declarations.len());
    let descriptors: Vec<_> = declarations.iter().map(resolve).collect();

    validator::validate(&descriptors, options.bucket_policy).map_err(CompileError::new)?;

    let facades: Vec<_> = grouper::group(descriptors.into_iter().map(|d| d.resolved))
        .into_iter()
        .map(|(namespace, metrics)| FacadeDefinition::new(namespace, metrics))
        .collect();

    log::info!(target: LOG_TARGET, "Compiled {} metrics into {} facades", declarations.len(), facades.len());
    Ok(facades)
}
