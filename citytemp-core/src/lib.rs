//! Core library for the `citytemp` CLI.
//!
//! This crate defines:
//! - The fixed set of supported cities and the per-city result model
//! - Normalization of provider payload fields and the sentinel reading
//! - Haversine distance and nearest-valid-station selection
//! - Temperature sources (station observations, daily forecast)
//! - A best-effort aggregator that always returns a complete report
//! - Configuration handling
//!
//! It is used by `citytemp-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod model;
pub mod normalize;
pub mod resolver;
pub mod source;

pub use aggregate::{collect_all, collect_temperatures};
pub use config::Config;
pub use error::SourceError;
pub use http::HttpFetcher;
pub use model::{Candidate, City, Coordinates, ReportStatus, TemperatureReport, TemperatureResult};
pub use source::{
    SourceId, TemperatureSource, default_source_from_config, forecast::DailyForecast,
    observations::StationObservations, source_from_config,
};
