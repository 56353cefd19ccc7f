//! Metric column identifiers.

use std::num::NonZeroUsize;

/// A derived column of an [`AnnotatedBarSeries`](crate::AnnotatedBarSeries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Trailing mean of close.
    MovingAverage {
        /// Window length in bars.
        window: NonZeroUsize,
    },
    /// Trailing median of close.
    RollingMedian {
        /// Window length in bars.
        window: NonZeroUsize,
    },
    /// Cumulative volume-weighted average of typical price.
    Vwap,
}

impl Metric {
    /// Returns the column name, e.g. `ma_6`, `median_3` or `vwap`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::MovingAverage { window } => format!("ma_{window}"),
            Self::RollingMedian { window } => format!("median_{window}"),
            Self::Vwap => "vwap".to_string(),
        }
    }

}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
