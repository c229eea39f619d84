use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the compiler treats bucket annotations that cannot all be honored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BucketPolicy {
    /// Reject bucket annotations on non-histograms and conflicting annotations on histograms
    #[default]
    Strict,

    /// Apply the precedence explicit > exponential > linear > default silently, and
    /// ignore bucket annotations on non-histograms, logging a warning for each case
    Lenient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub bucket_policy: BucketPolicy,
}

impl CompileOptions {
    #[must_use]
    pub const fn with_bucket_policy(bucket_policy: BucketPolicy) -> Self {
        Self { bucket_policy }
    }
}
