use strum::{Display, EnumIter};

/// Built-in bucket ladder applied to histograms that declare no bucket strategy.
///
/// Tuned for latency timers measured in seconds: fine-grained in the low milliseconds,
/// then progressively coarser up to one minute.
pub const DEFAULT_TIMER_BUCKETS: &[f64] = &[
    0.002, 0.004, 0.006, 0.008, 0.01, 0.02, 0.04, 0.06, 0.08, 0.1, 0.2, 0.4, 0.6, 0.8, 1.0, 1.2, 1.4, 1.6, 1.8, 2.0, 2.5, 3.0, 3.5,
    4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0, 9.5, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0,
];

/// The strategy a histogram uses to lay out its bucket boundaries
#[derive(Debug, Clone, PartialEq)]
pub enum BucketSpec {
    /// A literal, strictly increasing list of upper bounds
    Explicit { values: Vec<f64> },

    /// `count` bounds starting at `start`, each one `factor` times the previous
    Exponential { start: f64, factor: f64, count: usize },

    /// `count` bounds starting at `start`, each one `width` above the previous
    Linear { start: f64, width: f64, count: usize },

    /// [`DEFAULT_TIMER_BUCKETS`]
    Default,
}

/// Discriminant of a [`BucketSpec`], ordered by resolution precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BucketKind {
    Explicit,
    Exponential,
    Linear,
    Default,
}

impl BucketSpec {
    #[must_use]
    pub const fn kind(&self) -> BucketKind {
        match self {
            Self::Explicit { .. } => BucketKind::Explicit,
            Self::Exponential { .. } => BucketKind::Exponential,
            Self::Linear { .. } => BucketKind::Linear,
            Self::Default => BucketKind::Default,
        }
    }

    /// Expand the strategy into its concrete list of upper bounds
    ///
    /// Formulaic ladders are computed by repeated multiplication or addition, the same
    /// way the client library computes them, so the values match bit for bit.
    #[must_use]
    pub fn bounds(&self) -> Vec<f64> {
        match self {
            Self::Explicit { values } => values.clone(),
            Self::Exponential { start, factor, count } => {
                let mut bounds = Vec::with_capacity(*count);
                let mut next = *start;
                for _ in 0..*count {
                    bounds.push(next);
                    next *= factor;
                }
                bounds
            }
            Self::Linear { start, width, count } => {
                let mut bounds = Vec::with_capacity(*count);
                let mut next = *start;
                for _ in 0..*count {
                    bounds.push(next);
                    next += width;
                }
                bounds
            }
            Self::Default => DEFAULT_TIMER_BUCKETS.to_vec(),
        }
    }

    /// Describe why the client library would reject this strategy, if it would
    ///
    /// Formulaic ladders must also stay finite and strictly increasing once expanded, which
    /// rules out parameters that overflow or are swallowed by floating point rounding.
    #[must_use]
    pub fn problem(&self) -> Option<String> {
        let parameters = match self {
            Self::Explicit { values } if values.is_empty() => Some("explicit bucket list is empty".to_string()),
            Self::Explicit { .. } | Self::Default => None,
            Self::Exponential { start, factor, count } => {
                if let Some(problem) = count_problem("exponential", *count) {
                    Some(problem)
                } else if !start.is_finite() || *start <= 0.0 {
                    Some(format!("exponential buckets need a positive start, got {start}"))
                } else if !factor.is_finite() || *factor <= 1.0 {
                    Some(format!("exponential buckets need a factor greater than 1, got {factor}"))
                } else {
                    None
                }
            }
            Self::Linear { start, width, count } => {
                if let Some(problem) = count_problem("linear", *count) {
                    Some(problem)
                } else if !start.is_finite() {
                    Some(format!("linear buckets need a finite start, got {start}"))
                } else if !width.is_finite() || *width <= 0.0 {
                    Some(format!("linear buckets need a positive width, got {width}"))
                } else {
                    None
                }
            }
        };

        parameters.or_else(|| ladder_problem(&self.bounds()))
    }
}

/// Upper limit on the bucket count of a formulaic ladder
pub const MAX_BUCKET_COUNT: usize = 10_000;

fn count_problem(kind: &str, count: usize) -> Option<String> {
    if count == 0 {
        Some(format!("{kind} bucket count must be at least 1"))
    } else if count > MAX_BUCKET_COUNT {
        Some(format!("{kind} bucket count must be at most {MAX_BUCKET_COUNT}, got {count}"))
    } else {
        None
    }
}

fn ladder_problem(bounds: &[f64]) -> Option<String> {
    if let Some(value) = bounds.iter().find(|v| !v.is_finite()) {
        return Some(format!("bucket bound {value} is not finite"));
    }

    bounds
        .windows(2)
        .find(|pair| pair[0] >= pair[1])
        .map(|pair| format!("bucket bounds must be strictly increasing, but {} is followed by {}", pair[0], pair[1]))
}
