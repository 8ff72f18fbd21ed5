use serde::Serialize;
use std::collections::BTreeMap;

use crate::normalize;

/// Point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// GeoJSON positions are `[longitude, latitude]`.
    pub const fn from_lon_lat(longitude: f64, latitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// The closed set of cities a temperature is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum City {
    Lisboa,
    Porto,
    Faro,
}

impl City {
    pub const fn all() -> &'static [City] {
        &[City::Lisboa, City::Porto, City::Faro]
    }

    pub fn name(&self) -> &'static str {
        match self {
            City::Lisboa => "Lisboa",
            City::Porto => "Porto",
            City::Faro => "Faro",
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        match self {
            City::Lisboa => Coordinates::new(38.7223, -9.1393),
            City::Porto => Coordinates::new(41.1579, -8.6291),
            City::Faro => Coordinates::new(37.0194, -7.9304),
        }
    }

    /// Location code used by the daily forecast endpoint.
    pub fn forecast_id(&self) -> u32 {
        match self {
            City::Lisboa => 1110600,
            City::Porto => 1131200,
            City::Faro => 1080500,
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for City {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "lisboa" | "lisbon" => Ok(City::Lisboa),
            "porto" | "oporto" => Ok(City::Porto),
            "faro" => Ok(City::Faro),
            _ => Err(anyhow::anyhow!(
                "Unknown city '{value}'. Supported cities: Lisboa, Porto, Faro."
            )),
        }
    }
}

impl std::str::FromStr for City {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::try_from(s)
    }
}

/// One station reading or forecast entry considered during resolution.
///
/// The measurement is normalized on construction: sentinel and non-finite
/// readings are stored as `None` and the candidate is never selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub coordinates: Coordinates,
    measurement: Option<f64>,
    pub observed_at: String,
    pub station: Option<String>,
}

impl Candidate {
    pub fn new(coordinates: Coordinates, raw: f64, observed_at: impl Into<String>) -> Self {
        Self {
            coordinates,
            measurement: normalize::reading_f64(raw),
            observed_at: observed_at.into(),
            station: None,
        }
    }

    /// Build from an untyped payload field (number, numeric string or garbage).
    pub fn from_value(
        coordinates: Coordinates,
        raw: &serde_json::Value,
        observed_at: impl Into<String>,
    ) -> Self {
        Self {
            coordinates,
            measurement: normalize::reading(raw),
            observed_at: observed_at.into(),
            station: None,
        }
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn measurement(&self) -> Option<f64> {
        self.measurement
    }

    pub fn is_valid(&self) -> bool {
        self.measurement.is_some()
    }
}

/// Temperature reported for a single city.
///
/// `observed_at` and `station` are only ever present alongside a value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureResult {
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    station: Option<String>,
}

impl TemperatureResult {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn from_candidate(candidate: &Candidate) -> Self {
        match candidate.measurement() {
            Some(value) => Self {
                value: Some(value),
                observed_at: Some(candidate.observed_at.clone()),
                station: candidate.station.clone(),
            },
            None => Self::missing(),
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn observed_at(&self) -> Option<&str> {
        self.observed_at.as_deref()
    }

    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// At least one city carries a value.
    Updated,
    /// Nothing could be resolved, usually because the fetch failed.
    Unavailable,
}

/// Result for every supported city, keyed by city.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemperatureReport {
    results: BTreeMap<City, TemperatureResult>,
}

impl TemperatureReport {
    pub fn empty() -> Self {
        let results = City::all()
            .iter()
            .map(|city| (*city, TemperatureResult::missing()))
            .collect();

        Self { results }
    }

    pub fn get(&self, city: City) -> &TemperatureResult {
        // Every city is inserted by `empty()` and entries are never removed.
        self.results.get(&city).unwrap_or(&MISSING)
    }

    pub(crate) fn set(&mut self, city: City, result: TemperatureResult) {
        self.results.insert(city, result);
    }

    pub fn iter(&self) -> impl Iterator<Item = (City, &TemperatureResult)> {
        self.results.iter().map(|(city, result)| (*city, result))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Always false for a report built by [`TemperatureReport::empty`];
    /// present because `len` is public.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn has_data(&self) -> bool {
        self.results.values().any(|r| !r.is_missing())
    }

    pub fn status(&self) -> ReportStatus {
        if self.has_data() {
            ReportStatus::Updated
        } else {
            ReportStatus::Unavailable
        }
    }
}

impl Default for TemperatureReport {
    fn default() -> Self {
        Self::empty()
    }
}

static MISSING: TemperatureResult = TemperatureResult {
    value: None,
    observed_at: None,
    station: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn city_name_roundtrip() {
        for city in City::all() {
            let parsed = City::try_from(city.name()).expect("roundtrip should succeed");
            assert_eq!(*city, parsed);
        }
    }

    #[test]
    fn city_parse_accepts_aliases_and_case() {
        assert_eq!("lisbon".parse::<City>().unwrap(), City::Lisboa);
        assert_eq!(" PORTO ".parse::<City>().unwrap(), City::Porto);
    }

    #[test]
    fn unknown_city_error() {
        let err = City::try_from("Madrid").unwrap_err();
        assert!(err.to_string().contains("Unknown city"));
        assert!(err.to_string().contains("Lisboa, Porto, Faro"));
    }

    #[test]
    fn candidate_drops_sentinel_and_non_finite() {
        let here = City::Lisboa.coordinates();
        assert!(!Candidate::new(here, -99.0, "t").is_valid());
        assert!(!Candidate::new(here, f64::NAN, "t").is_valid());
        assert!(!Candidate::new(here, f64::INFINITY, "t").is_valid());
        assert_eq!(Candidate::new(here, 21.5, "t").measurement(), Some(21.5));
        assert_eq!(
            Candidate::from_value(here, &json!("17.3"), "t").measurement(),
            Some(17.3)
        );
    }

    #[test]
    fn result_from_invalid_candidate_is_missing() {
        let c = Candidate::new(City::Faro.coordinates(), -99.0, "2024-06-01T10:00").with_station("X");
        let result = TemperatureResult::from_candidate(&c);
        assert!(result.is_missing());
        assert_eq!(result.observed_at(), None);
        assert_eq!(result.station(), None);
    }

    #[test]
    fn result_from_valid_candidate_carries_timestamp() {
        let c = Candidate::new(City::Faro.coordinates(), 24.0, "2024-06-01T10:00").with_station("Faro");
        let result = TemperatureResult::from_candidate(&c);
        assert_eq!(result.value(), Some(24.0));
        assert_eq!(result.observed_at(), Some("2024-06-01T10:00"));
        assert_eq!(result.station(), Some("Faro"));
    }

    #[test]
    fn empty_report_contains_every_city() {
        let report = TemperatureReport::empty();
        assert_eq!(report.len(), City::all().len());
        for city in City::all() {
            assert!(report.get(*city).is_missing());
        }
        assert_eq!(report.status(), ReportStatus::Unavailable);
        assert!(!report.is_empty());
    }

    #[test]
    fn report_serializes_by_city_name() {
        let mut report = TemperatureReport::empty();
        let c = Candidate::new(City::Porto.coordinates(), 19.25, "2024-06-01");
        report.set(City::Porto, TemperatureResult::from_candidate(&c));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "Lisboa": { "value": null },
                "Porto": { "value": 19.25, "observedAt": "2024-06-01" },
                "Faro": { "value": null },
            })
        );
        assert_eq!(report.status(), ReportStatus::Updated);
    }
}
