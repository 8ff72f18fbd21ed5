use crate::{
    Config,
    error::SourceError,
    http::HttpFetcher,
    model::{Candidate, City},
    source::{forecast::DailyForecast, observations::StationObservations},
};
use anyhow::Context;
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod forecast;
pub mod observations;

/// Outcome of resolving one city: a candidate, nothing usable, or an error
/// confined to that city.
pub type CityOutcome = (City, Result<Option<Candidate>, SourceError>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Observations,
    Forecast,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Observations => "observations",
            SourceId::Forecast => "forecast",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[SourceId::Observations, SourceId::Forecast]
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            SourceId::Observations => {
                "https://api.ipma.pt/open-data/observation/meteorology/stations/obs-surface.geojson"
            }
            SourceId::Forecast => "https://api.ipma.pt/open-data/forecast/meteorology/cities/daily",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "observations" => Ok(SourceId::Observations),
            "forecast" => Ok(SourceId::Forecast),
            _ => Err(anyhow::anyhow!(
                "Unknown source '{value}'. Supported sources: observations, forecast."
            )),
        }
    }
}

/// Where city temperatures come from.
///
/// An outer `Err` means nothing could be fetched at all; per-city errors
/// only affect their own city.
#[async_trait]
pub trait TemperatureSource: Send + Sync + Debug {
    fn id(&self) -> SourceId;

    async fn resolve(&self, cities: &[City]) -> Result<Vec<CityOutcome>, SourceError>;
}

/// Construct a source from config and explicit SourceId.
pub fn source_from_config(
    id: SourceId,
    config: &Config,
) -> anyhow::Result<Box<dyn TemperatureSource>> {
    let fetcher = HttpFetcher::new(config.timeout()).context("Failed to build HTTP client")?;
    let url = config.endpoint(id).to_owned();

    let boxed: Box<dyn TemperatureSource> = match id {
        SourceId::Observations => Box::new(StationObservations::new(fetcher, url)),
        SourceId::Forecast => Box::new(DailyForecast::new(fetcher, url)),
    };

    Ok(boxed)
}

/// Construct the default source from config, using `default_source` field.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn TemperatureSource>> {
    let id = config.default_source_id()?;
    source_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn source_id_as_str_roundtrip() {
        for id in SourceId::all() {
            let s = id.as_str();
            let parsed = SourceId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn source_id_parse_is_case_insensitive() {
        assert_eq!(SourceId::try_from("Forecast").unwrap(), SourceId::Forecast);
    }

    #[test]
    fn unknown_source_error() {
        let err = SourceId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown source"));
    }

    #[test]
    fn source_from_config_uses_requested_id() {
        let cfg = Config::default();
        let source = source_from_config(SourceId::Forecast, &cfg).unwrap();
        assert_eq!(source.id(), SourceId::Forecast);
    }

    #[test]
    fn default_source_from_config_falls_back_to_observations() {
        let cfg = Config::default();
        let source = default_source_from_config(&cfg).unwrap();
        assert_eq!(source.id(), SourceId::Observations);
    }

    #[test]
    fn default_source_from_config_errors_on_unknown_id() {
        let cfg = Config {
            default_source: Some("satellite".to_string()),
            ..Config::default()
        };
        let err = default_source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Unknown source"));
    }
}
