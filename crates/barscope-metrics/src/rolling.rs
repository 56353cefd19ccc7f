//! Windowed and cumulative kernels.
//!
//! Kernels work at full precision and return one value per input element;
//! rounding is applied once, by [`annotate`](crate::annotate).

use std::num::NonZeroUsize;

use barscope_types::Bar;

use crate::WindowPolicy;

/// Returns the trailing window ending at `index`, or `None` if the policy
/// requires a full window that is not yet available.
fn trailing<T>(
    values: &[T],
    index: usize,
    window: NonZeroUsize,
    policy: WindowPolicy,
) -> Option<&[T]> {
    let window = window.get();
    if policy == WindowPolicy::Strict && index + 1 < window {
        return None;
    }
    let start = (index + 1).saturating_sub(window);
    Some(&values[start..=index])
}

/// Arithmetic mean of `values` over a trailing window.
#[must_use]
pub fn moving_average(
    values: &[f64],
    window: NonZeroUsize,
    policy: WindowPolicy,
) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            trailing(values, i, window, policy)
                .map(|w| w.iter().sum::<f64>() / w.len() as f64)
        })
        .collect()
}

/// Median of `values` over a trailing window.
///
/// Even-length windows average the two middle values.
#[must_use]
pub fn rolling_median(
    values: &[f64],
    window: NonZeroUsize,
    policy: WindowPolicy,
) -> Vec<Option<f64>> {
    let mut scratch = Vec::with_capacity(window.get());
    (0..values.len())
        .map(|i| {
            let w = trailing(values, i, window, policy)?;
            scratch.clear();
            scratch.extend_from_slice(w);
            scratch.sort_unstable_by(f64::total_cmp);

            let mid = scratch.len() / 2;
            Some(if scratch.len() % 2 == 0 {
                (scratch[mid - 1] + scratch[mid]) / 2.0
            } else {
                scratch[mid]
            })
        })
        .collect()
}

/// Cumulative volume-weighted average of typical price from the first bar.
///
/// An element is `None` while cumulative volume is still zero.
#[must_use]
pub fn vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut price_volume = 0.0;
    let mut volume = 0.0;
    bars.iter()
        .map(|bar| {
            price_volume += bar.typical_price() * bar.volume;
            volume += bar.volume;
            (volume > 0.0).then(|| price_volume / volume)
        })
        .collect()
}

/// Rounds `value` to `decimals` places, ties to even.
///
/// Values are returned unchanged when `decimals` exceeds the precision an
/// `f64` can carry.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals > 15 {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}
