use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{CustomType, CustomUserError, Select, Text, validator::Validation};

use citytemp_core::{City, Config, SourceId, collect_temperatures, source_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citytemp", version, about = "Current temperature for Lisboa, Porto and Faro")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the default source, its endpoint and the request timeout.
    Configure {
        /// Source short name, "observations" or "forecast". Asked for when absent.
        source: Option<String>,
    },

    /// Show temperatures; all supported cities when none are given.
    Show {
        /// City names, e.g. "Lisboa" or "porto".
        cities: Vec<String>,

        /// Override the configured source for this call.
        #[arg(long)]
        source: Option<String>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List supported cities.
    Cities,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { source } => configure(source)?,
            Command::Show {
                cities,
                source,
                json,
            } => show(cities, source, json).await?,
            Command::Cities => print!("{}", render::render_cities()),
        }

        Ok(())
    }
}

async fn show(cities: Vec<String>, source: Option<String>, json: bool) -> Result<()> {
    let config = Config::load()?;

    let id = match source {
        Some(s) => SourceId::try_from(s.as_str())?,
        None => config.default_source_id()?,
    };

    let requested = parse_cities(&cities)?;
    let source = source_from_config(id, &config)?;

    tracing::debug!("Resolving {:?} via {}", requested, id);
    let report = collect_temperatures(source.as_ref(), &requested).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report));
        println!();
        println!("{}", render::status_line(report.status()));
    }

    Ok(())
}

fn parse_cities(names: &[String]) -> Result<Vec<City>> {
    if names.is_empty() {
        return Ok(City::all().to_vec());
    }

    names.iter().map(|name| City::try_from(name.as_str())).collect()
}

fn configure(source: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let id = match source {
        Some(s) => SourceId::try_from(s.as_str())?,
        None => Select::new("Default source:", SourceId::all().to_vec()).prompt()?,
    };

    let endpoint = Text::new("Endpoint URL:")
        .with_default(config.endpoint(id))
        .prompt()?;

    let timeout = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout().as_secs())
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(validate_timeout)
        .prompt()?;

    config.set_default_source(id);
    config.set_endpoint(id, endpoint.trim().to_string());
    config.timeout_secs = Some(timeout);
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

fn validate_timeout(secs: &u64) -> Result<Validation, CustomUserError> {
    if *secs == 0 {
        Ok(Validation::Invalid("The timeout must be at least 1 second".into()))
    } else {
        Ok(Validation::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_city_arguments_mean_all_cities() {
        assert_eq!(parse_cities(&[]).unwrap(), City::all().to_vec());
    }

    #[test]
    fn city_arguments_are_parsed() {
        let names = vec!["porto".to_string(), "Lisbon".to_string()];
        assert_eq!(parse_cities(&names).unwrap(), vec![City::Porto, City::Lisboa]);
    }

    #[test]
    fn zero_timeout_is_refused_by_the_prompt() {
        assert!(matches!(validate_timeout(&0), Ok(Validation::Invalid(_))));
        assert!(matches!(validate_timeout(&5), Ok(Validation::Valid)));
    }

    #[test]
    fn unknown_city_argument_is_rejected() {
        let names = vec!["Madrid".to_string()];
        let err = parse_cities(&names).unwrap_err();
        assert!(err.to_string().contains("Unknown city"));
    }

    #[test]
    fn show_arguments_parse() {
        let cli = Cli::try_parse_from(["citytemp", "show", "faro", "--source", "forecast", "--json"])
            .unwrap();
        match cli.command {
            Command::Show {
                cities,
                source,
                json,
            } => {
                assert_eq!(cities, vec!["faro"]);
                assert_eq!(source.as_deref(), Some("forecast"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
