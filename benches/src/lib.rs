//! Benchmark fixtures for barscope.

use barscope_lib::{Bar, BarSeries, Timeframe};
use chrono::{TimeDelta, TimeZone, Utc};

/// Minutes in a regular US equity session.
pub const SESSION_MINUTES: i64 = 390;

/// Builds `days` consecutive sessions of 1-minute bars.
///
/// Prices follow a deterministic oscillation so runs are comparable; bars
/// always satisfy the OHLC bounds.
pub fn session_series(days: i64) -> BarSeries {
    let first_open = Utc
        .with_ymd_and_hms(2024, 1, 2, 14, 30, 0)
        .single()
        .unwrap_or_default();

    let bars = (0..days)
        .flat_map(|day| {
            let open = first_open + TimeDelta::days(day);
            (0..SESSION_MINUTES).map(move |minute| {
                let step = (day * SESSION_MINUTES + minute) as f64;
                let mid = 100.0 + (step / 37.0).sin() * 2.5 + (step / 5.0).cos() * 0.3;
                let close = mid + (step / 3.0).sin() * 0.1;
                Bar::new(
                    open + TimeDelta::minutes(minute),
                    mid,
                    mid.max(close) + 0.05,
                    mid.min(close) - 0.05,
                    close,
                    1_000.0 + (minute % 60) as f64 * 10.0,
                )
            })
        })
        .collect();

    match BarSeries::new(bars, Timeframe::Minute1.duration()) {
        Ok(series) => series,
        Err(e) => panic!("benchmark fixture is invalid: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_series_shape() {
        let series = session_series(3);
        assert_eq!(series.len(), 3 * SESSION_MINUTES as usize);
        assert_eq!(series.period(), TimeDelta::minutes(1));
    }
}
