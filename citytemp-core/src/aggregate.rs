//! Best-effort collection of temperatures for a batch of cities.
//!
//! Whatever the source does, the caller gets a report with an entry for
//! every supported city. Failures are logged and leave the affected cities
//! without a value.

use tracing::{debug, warn};

use crate::{
    model::{City, TemperatureReport, TemperatureResult},
    source::TemperatureSource,
};

/// Resolve `requested` cities through `source`.
///
/// Cities that were not requested stay missing. Never fails.
pub async fn collect_temperatures(
    source: &dyn TemperatureSource,
    requested: &[City],
) -> TemperatureReport {
    let mut report = TemperatureReport::empty();

    let mut cities = requested.to_vec();
    cities.sort();
    cities.dedup();

    if cities.is_empty() {
        return report;
    }

    let outcomes = match source.resolve(&cities).await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            warn!(source = %source.id(), "Failed to fetch temperatures: {}", e);
            return report;
        }
    };

    for (city, outcome) in outcomes {
        if !cities.contains(&city) {
            debug!("Ignoring unrequested result for {}", city);
            continue;
        }

        match outcome {
            Ok(Some(candidate)) => {
                let result = TemperatureResult::from_candidate(&candidate);
                if result.is_missing() {
                    debug!("{}: selected entry has no usable value", city);
                }
                report.set(city, result);
            }
            Ok(None) => debug!("{}: no station with a valid reading", city),
            Err(e) => warn!(
                source = %source.id(),
                "Failed to resolve temperature for {}: {}", city, e
            ),
        }
    }

    report
}

/// Resolve every supported city.
pub async fn collect_all(source: &dyn TemperatureSource) -> TemperatureReport {
    collect_temperatures(source, City::all()).await
}
