use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde_json::Value;

use crate::{
    error::SourceError,
    http::HttpFetcher,
    model::{Candidate, City},
    normalize,
};

use super::{CityOutcome, SourceId, TemperatureSource};

/// Daily forecast per city, one request per city issued concurrently.
/// The reported value is today's maximum.
#[derive(Debug, Clone)]
pub struct DailyForecast {
    fetcher: HttpFetcher,
    base_url: String,
    today: Option<NaiveDate>,
}

impl DailyForecast {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            today: None,
        }
    }

    /// Pin the date used to pick the forecast entry instead of the UTC date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn city_url(&self, city: City) -> String {
        format!("{}/{}.json", self.base_url.trim_end_matches('/'), city.forecast_id())
    }

    async fn resolve_city(
        &self,
        city: City,
        today: NaiveDate,
    ) -> Result<Option<Candidate>, SourceError> {
        let body = self.fetcher.get_json(&self.city_url(city)).await?;

        let entries = body.get("data").and_then(Value::as_array).ok_or_else(|| {
            SourceError::payload(format!("forecast for {city} has no `data` array"))
        })?;

        Ok(select_entry(entries, today).map(|entry| entry_candidate(city, entry)))
    }
}

#[async_trait]
impl TemperatureSource for DailyForecast {
    fn id(&self) -> SourceId {
        SourceId::Forecast
    }

    async fn resolve(&self, cities: &[City]) -> Result<Vec<CityOutcome>, SourceError> {
        let today = self.today();

        let requests = cities
            .iter()
            .map(|city| async move { (*city, self.resolve_city(*city, today).await) });

        Ok(join_all(requests).await)
    }
}

/// Entry dated today, else the first one.
fn select_entry(entries: &[Value], today: NaiveDate) -> Option<&Value> {
    let today = today.format("%Y-%m-%d").to_string();

    entries
        .iter()
        .find(|entry| {
            entry
                .get("forecastDate")
                .and_then(Value::as_str)
                .is_some_and(|date| date.starts_with(&today))
        })
        .or_else(|| entries.first())
}

fn entry_candidate(city: City, entry: &Value) -> Candidate {
    let date = entry.get("forecastDate").and_then(Value::as_str).unwrap_or_default();
    let t_max = entry.get("tMax").unwrap_or(&Value::Null);
    let t_min = entry.get("tMin").and_then(normalize::reading);

    tracing::debug!(
        "{}: forecast for {} max {:?} min {:?}",
        city,
        date,
        normalize::reading(t_max),
        t_min
    );

    Candidate::from_value(city.coordinates(), t_max, date)
}
