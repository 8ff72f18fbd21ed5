use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::SourceError,
    http::HttpFetcher,
    model::{Candidate, City, Coordinates},
    normalize,
    resolver::nearest_valid_with_distance,
};

use super::{CityOutcome, SourceId, TemperatureSource};

/// Latest surface observations from every station in a single GeoJSON
/// download; each city takes the nearest station with a reading.
#[derive(Debug, Clone)]
pub struct StationObservations {
    fetcher: HttpFetcher,
    url: String,
}

impl StationObservations {
    pub fn new(fetcher: HttpFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TemperatureSource for StationObservations {
    fn id(&self) -> SourceId {
        SourceId::Observations
    }

    async fn resolve(&self, cities: &[City]) -> Result<Vec<CityOutcome>, SourceError> {
        if cities.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.fetcher.get_json(&self.url).await?;
        let features = features(&body)?;

        tracing::debug!("Observation payload has {} features", features.len());

        Ok(cities
            .iter()
            .map(|city| (*city, Ok(resolve_city(*city, features))))
            .collect())
    }
}

fn features(body: &Value) -> Result<&[Value], SourceError> {
    body.get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| SourceError::payload("observation payload has no `features` array"))
}

/// Nearest station with a reading for one city.
pub(crate) fn resolve_city(city: City, features: &[Value]) -> Option<Candidate> {
    let candidates: Vec<Candidate> = features.iter().filter_map(candidate_from_feature).collect();

    let nearest = nearest_valid_with_distance(city.coordinates(), &candidates);

    if let Some((station, distance)) = nearest {
        tracing::debug!(
            "{}: nearest station {} at {:.1} km",
            city,
            station.station.as_deref().unwrap_or("<unnamed>"),
            distance
        );
    }

    nearest.map(|(station, _)| station.clone())
}

/// Stations without a reading or without usable coordinates are skipped.
fn candidate_from_feature(feature: &Value) -> Option<Candidate> {
    let properties = feature.get("properties");
    let field = |name: &str| properties.and_then(|p| p.get(name));

    let raw = field("temperatura").unwrap_or(&Value::Null);
    normalize::reading(raw)?;

    let coordinates = feature
        .pointer("/geometry/coordinates")
        .and_then(Value::as_array)
        .and_then(|pos| match pos.as_slice() {
            [lon, lat, ..] => Some((normalize::number(lon)?, normalize::number(lat)?)),
            _ => None,
        })
        .map(|(lon, lat)| Coordinates::from_lon_lat(lon, lat));

    let Some(coordinates) = coordinates else {
        tracing::debug!(
            "Skipping station {} without usable coordinates",
            field("localEstacao").and_then(serde_json::Value::as_str).unwrap_or("<unnamed>")
        );
        return None;
    };

    let observed_at = field("time").and_then(Value::as_str).unwrap_or_default();

    let mut candidate = Candidate::from_value(coordinates, raw, observed_at);
    if let Some(name) = field("localEstacao").and_then(Value::as_str) {
        candidate = candidate.with_station(name);
    }

    Some(candidate)
}
