//! Timeframes command implementation.

use anyhow::Result;
use barscope_lib::prelude::*;

/// Print every supported timeframe with its id and length.
pub(crate) fn list_timeframes() -> Result<()> {
    println!("{:<6} {:<12} {:>10}", "ID", "NAME", "SECONDS");
    println!("{}", "-".repeat(30));

    for timeframe in Timeframe::all() {
        println!(
            "{:<6} {:<12} {:>10}",
            timeframe.as_str(),
            timeframe.label(),
            timeframe.seconds()
        );
    }

    println!("\nTotal: {} timeframes", Timeframe::all().len());
    Ok(())
}
