//! CLI command implementations.

pub(crate) mod report;
pub(crate) mod resample;
pub(crate) mod timeframes;
