//! Overlay selection and window configuration.

use std::num::NonZeroUsize;
use std::path::Path;

use barscope_types::{BarscopeError, Result};
use serde::{Deserialize, Serialize};

use crate::Metric;

/// Window length of the moving average in the intermediate preset.
const INTERMEDIATE_MA_WINDOW: i64 = 6;

/// Window length of the rolling median in the intermediate preset.
const INTERMEDIATE_MEDIAN_WINDOW: i64 = 3;

/// Decimal places of derived monetary values.
const DEFAULT_DECIMALS: u32 = 2;

/// How trailing windows behave before `window` bars are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Use whatever history exists (minimum of one bar).
    #[default]
    Shrinking,
    /// Emit a missing value until the window has filled.
    Strict,
}

/// Selects which overlays [`annotate`](crate::annotate) computes.
///
/// Deserializes from JSON with every field optional, e.g.
/// `{"moving_average_window": 6, "include_vwap": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Moving average window in bars, if enabled.
    ///
    /// Signed so that a non-positive window read from a config file is
    /// reported as [`BarscopeError::InvalidWindow`], not as a parse error.
    pub moving_average_window: Option<i64>,
    /// Rolling median window in bars, if enabled.
    pub rolling_median_window: Option<i64>,
    /// Whether to compute cumulative VWAP.
    pub include_vwap: bool,
    /// Behaviour of windows at the start of the series.
    pub window_policy: WindowPolicy,
    /// Decimal places of output values.
    pub decimals: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            moving_average_window: None,
            rolling_median_window: None,
            include_vwap: false,
            window_policy: WindowPolicy::Shrinking,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl MetricsConfig {
    /// All three overlays: 6-bar moving average, 3-bar median and VWAP.
    ///
    /// Intended for intermediate granularities such as 5-minute bars, where
    /// six bars span 30 minutes and three bars span 15 minutes.
    #[must_use]
    pub fn intermediate() -> Self {
        Self {
            moving_average_window: Some(INTERMEDIATE_MA_WINDOW),
            rolling_median_window: Some(INTERMEDIATE_MEDIAN_WINDOW),
            include_vwap: true,
            ..Self::default()
        }
    }

    /// VWAP only, for coarse granularities where a window over a handful of
    /// bars carries little information.
    #[must_use]
    pub fn vwap_only() -> Self {
        Self {
            include_vwap: true,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Sets the moving average window.
    #[must_use]
    pub const fn with_moving_average(mut self, window: i64) -> Self {
        self.moving_average_window = Some(window);
        self
    }

    /// Sets the rolling median window.
    #[must_use]
    pub const fn with_rolling_median(mut self, window: i64) -> Self {
        self.rolling_median_window = Some(window);
        self
    }

    /// Enables or disables VWAP.
    #[must_use]
    pub const fn with_vwap(mut self, include: bool) -> Self {
        self.include_vwap = include;
        self
    }

    /// Sets the window policy.
    #[must_use]
    pub const fn with_window_policy(mut self, policy: WindowPolicy) -> Self {
        self.window_policy = policy;
        self
    }

    /// Sets the number of decimal places of output values.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Returns the enabled metrics in column order: moving average, median, VWAP.
    ///
    /// # Errors
    ///
    /// Returns [`BarscopeError::InvalidWindow`] if a configured window is zero
    /// or negative.
    pub fn metrics(&self) -> Result<Vec<Metric>> {
        let mut metrics = Vec::with_capacity(3);
        if let Some(window) = self.moving_average_window {
            metrics.push(Metric::MovingAverage {
                window: non_zero(window, "moving average")?,
            });
        }
        if let Some(window) = self.rolling_median_window {
            metrics.push(Metric::RollingMedian {
                window: non_zero(window, "rolling median")?,
            });
        }
        if self.include_vwap {
            metrics.push(Metric::Vwap);
        }
        Ok(metrics)
    }
}

fn non_zero(window: i64, metric: &str) -> Result<NonZeroUsize> {
    usize::try_from(window)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| BarscopeError::InvalidWindow {
            metric: metric.to_string(),
            window,
        })
}
