use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    #[serde(alias = "Counter")]
    Counter,

    #[serde(alias = "Gauge")]
    Gauge,

    #[serde(alias = "Histogram")]
    Histogram,
}

impl MetricType {
    #[must_use]
    pub const fn is_histogram(self) -> bool {
        matches!(self, Self::Histogram)
    }
}
