// crates/countries-core/src/pipeline.rs

//! # Orchestrator
//!
//! Linear run, no retries:
//!
//! 1. acquire records (cache-first); none -> [`EtlError::SourceUnavailable`]
//! 2. connect; failure -> [`EtlError::ConnectionFailure`]
//! 3. open a transaction and ensure the table exists
//! 4. transform every record and bulk-insert
//! 5. commit
//!
//! Step 6 (release) is ownership: the transaction, the connection and any
//! file handle are dropped on every exit path, and an uncommitted
//! transaction rolls back.

use crate::error::{EtlError, Result};
use crate::source::RecordSource;
use crate::store::{Connect, CountryTable, Database, SqlAssets};
use crate::transform::transform_all;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records obtained from the cache or the endpoints.
    pub fetched: usize,
    /// Rows submitted to the DML template.
    pub inserted: u64,
}

pub struct Pipeline<S, C> {
    source: S,
    connector: C,
    assets: SqlAssets,
    use_cache: bool,
}

impl<S: RecordSource, C: Connect> Pipeline<S, C> {
    pub fn new(source: S, connector: C, assets: SqlAssets, use_cache: bool) -> Self {
        Self {
            source,
            connector,
            assets,
            use_cache,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn run(&self) -> Result<RunSummary> {
        let countries = self.source.load(self.use_cache);
        if countries.is_empty() {
            error!("no country data returned from cache or API");
            return Err(EtlError::SourceUnavailable);
        }
        info!(count = countries.len(), "country records acquired");

        let mut conn = self.connector.connect()?;
        let mut tx = conn.transaction()?;

        let ddl = self.assets.read_ddl()?;
        tx.ensure_table(&ddl)?;
        info!(path = %self.assets.ddl.display(), "executed DDL, table ensured");

        let rows = transform_all(&countries);
        let dml = self.assets.read_dml()?;
        let inserted = tx.bulk_insert(&dml, &rows)?;
        info!(inserted, path = %self.assets.dml.display(), "inserted records");

        tx.commit()?;
        info!("transaction committed");

        Ok(RunSummary {
            fetched: countries.len(),
            inserted,
        })
    }
}

#[cfg(all(feature = "fetch", feature = "postgres"))]
pub type DefaultPipeline =
    Pipeline<crate::source::CountrySource<crate::source::RemoteSource>, crate::store::PgConnector>;

#[cfg(all(feature = "fetch", feature = "postgres"))]
impl DefaultPipeline {
    /// REST Countries -> cache -> PostgreSQL, all from one config.
    pub fn from_config(config: &crate::config::EtlConfig) -> Result<Self> {
        Ok(Self::new(
            crate::source::CountrySource::from_config(config)?,
            crate::store::PgConnector::new(config.database.clone()),
            SqlAssets::from_config(config),
            config.use_cache,
        ))
    }
}
