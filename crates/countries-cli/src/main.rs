//! countries-etl: one-shot batch run of the countries-core pipeline.
//!
//! Usage
//! -----
//!
//!   $ countries-etl
//!   $ RUST_LOG=debug countries-etl
//!   $ COUNTRIES_ETL__USE_CACHE=false countries-etl
//!
//! Configuration is layered: built-in defaults, then `countries-etl.toml`
//! (or the file named by `$COUNTRIES_ETL_CONFIG`), then `COUNTRIES_ETL__*`
//! environment variables. Database credentials missing from those layers
//! are read from `my_creds.env` (`USER` / `PASSWORD`).
//!
//! Exit status is non-zero when no country data could be obtained, the
//! database is unreachable, or any later step fails.
mod args;

#[cfg(not(all(feature = "fetch", feature = "postgres")))]
compile_error!("countries-etl needs both the `fetch` and `postgres` features");

use crate::args::CliArgs;
use anyhow::Context;
use clap::Parser;
use countries_core::{DefaultPipeline, EtlConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let _args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EtlConfig::load().context("loading configuration")?;
    info!(
        database = %config.database.target(),
        cache = %config.paths.cache.display(),
        use_cache = config.use_cache,
        "starting countries ETL"
    );

    let pipeline = DefaultPipeline::from_config(&config).context("building pipeline")?;
    let summary = pipeline.run().context("countries ETL run failed")?;

    info!(
        fetched = summary.fetched,
        inserted = summary.inserted,
        "ETL process completed successfully"
    );
    Ok(())
}
