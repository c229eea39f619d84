use crate::decl::{BucketKind, MetricType};
use core::fmt::{Display, Formatter, Result as FmtResult};

/// Why a set of bucket annotations cannot be honored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketConflict {
    /// Buckets were attached to a counter or gauge
    NotAHistogram(MetricType),

    /// A histogram carries more than one bucket strategy, listed in precedence order
    MultipleKinds(Vec<BucketKind>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    IllegalName { name: String },
    DuplicateName { name: String, count: usize },
    InconsistentBucketAnnotation { metric: String, conflict: BucketConflict },
    InvalidBuckets { metric: String, reason: String },
    IllegalLabel { metric: String, label: String },
    DuplicateLabel { metric: String, label: String },
    IllegalIdentifier { identifier: String },
    DuplicateMember { namespace: String, member: String },
}

/// One violated rule, along with every declaration site involved
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub sites: Vec<String>,
}

/// Every violation found in a declaration set
///
/// Compilation is all-or-nothing: when this is returned, no facade was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    errors: Vec<ValidationError>,
}

impl ValidationError {
    #[must_use]
    pub const fn new(kind: ErrorKind, sites: Vec<String>) -> Self {
        Self { kind, sites }
    }
}

impl CompileError {
    #[must_use]
    pub(crate) const fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl Display for BucketConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NotAHistogram(metric_type) => write!(f, "it is a {metric_type}, and only histograms have buckets"),
            Self::MultipleKinds(kinds) => {
                let kinds: Vec<_> = kinds.iter().map(ToString::to_string).collect();
                write!(f, "it carries {} bucket annotations ({}), but at most one is allowed", kinds.len(), kinds.join(", "))
            }
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::IllegalName { name } if name.is_empty() => write!(f, "metric name is empty"),
            Self::IllegalName { name } => {
                write!(f, "metric name '{name}' contains illegal characters, only ASCII letters, digits and '_' are allowed")
            }
            Self::DuplicateName { name, count } => {
                write!(f, "metric name '{name}' is declared {count} times, names must be unique across all namespaces")
            }
            Self::InconsistentBucketAnnotation { metric, conflict } => {
                write!(f, "bucket annotations on metric '{metric}' cannot be applied: {conflict}")
            }
            Self::InvalidBuckets { metric, reason } => write!(f, "metric '{metric}' has invalid buckets: {reason}"),
            Self::IllegalLabel { metric, label } => write!(
                f,
                "metric '{metric}' has illegal label '{label}', labels must match [A-Za-z_][A-Za-z0-9_]* and must not start with '__'"
            ),
            Self::DuplicateLabel { metric, label } => write!(f, "metric '{metric}' declares label '{label}' more than once"),
            Self::IllegalIdentifier { identifier } => write!(f, "'{identifier}' cannot be used as an identifier in generated code"),
            Self::DuplicateMember { namespace, member } => {
                write!(f, "namespace '{namespace}' would define member '{member}' more than once")
            }
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.kind)?;
        if !self.sites.is_empty() {
            write!(f, " [{}]", self.sites.join(", "))?;
        }

        Ok(())
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let n = self.errors.len();
        write!(f, "found {n} invalid metric declaration{}", if n == 1 { "" } else { "s" })?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }

        Ok(())
    }
}

impl core::error::Error for CompileError {}
