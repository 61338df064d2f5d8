use clap::Parser;

/// CLI arguments for countries-etl
///
/// Everything else comes from `countries-etl.toml` (or `$COUNTRIES_ETL_CONFIG`)
/// and `COUNTRIES_ETL__*` environment variables.
#[derive(Debug, Parser)]
#[command(
    name = "countries-etl",
    version,
    about = "Fetch REST Countries data, flatten it and load it into PostgreSQL"
)]
pub struct CliArgs {}
