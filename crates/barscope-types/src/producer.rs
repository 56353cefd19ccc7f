//! Sources of bar series.

use crate::{BarSeries, Result};

/// Anything that can deliver a [`BarSeries`].
///
/// Readers for external files, live ingestion paths and test fixtures all
/// implement this trait, so the aggregation and metrics code never depends
/// on where the bars came from.
pub trait BarSeriesProducer {
    /// Produces the next series.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or its records do not
    /// form a valid series.
    fn produce(&mut self) -> Result<BarSeries>;
}

/// A literal series is its own producer.
impl BarSeriesProducer for BarSeries {
    fn produce(&mut self) -> Result<BarSeries> {
        Ok(self.clone())
    }
}
