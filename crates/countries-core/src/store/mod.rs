// crates/countries-core/src/store/mod.rs

//! # Persistence Adapter
//!
//! The load side knows nothing about SQL dialects: it executes a DDL text
//! verbatim and binds [`FlatCountryRow`]s positionally into a DML template.
//! Both texts live in external files ([`SqlAssets`]).
//!
//! Nothing here commits on its own. The orchestrator frames
//! create + insert + commit in one transaction, and a transaction dropped
//! without [`CountryTable::commit`] is rolled back.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod pg;

pub use memory::{MemoryConnector, MemoryDatabase};
#[cfg(feature = "postgres")]
pub use pg::PgConnector;

use crate::error::{EtlError, Result};
use crate::row::FlatCountryRow;
use std::path::{Path, PathBuf};

/// Operations available inside an open transaction.
pub trait CountryTable: Sized {
    /// Executes the DDL text as-is (it may hold several statements).
    fn ensure_table(&mut self, ddl: &str) -> Result<()>;

    /// Executes `dml` once per row, binding the 17 columns as `$1..$17`.
    /// Returns the number of rows submitted.
    fn bulk_insert(&mut self, dml: &str, rows: &[FlatCountryRow]) -> Result<u64>;

    fn commit(self) -> Result<()>;
}

/// An open connection able to start a transaction.
pub trait Database {
    type Tx<'a>: CountryTable
    where
        Self: 'a;

    fn transaction(&mut self) -> Result<Self::Tx<'_>>;
}

/// Opens connections. Failures must map to [`EtlError::ConnectionFailure`].
pub trait Connect {
    type Conn: Database;

    fn connect(&self) -> Result<Self::Conn>;
}

/// Paths of the externally maintained SQL texts.
#[derive(Debug, Clone)]
pub struct SqlAssets {
    pub ddl: PathBuf,
    pub dml: PathBuf,
}

impl SqlAssets {
    pub fn new(ddl: impl Into<PathBuf>, dml: impl Into<PathBuf>) -> Self {
        Self {
            ddl: ddl.into(),
            dml: dml.into(),
        }
    }

    pub fn from_config(config: &crate::config::EtlConfig) -> Self {
        Self::new(&config.paths.ddl, &config.paths.dml)
    }

    pub fn read_ddl(&self) -> Result<String> {
        read_asset(&self.ddl)
    }

    pub fn read_dml(&self) -> Result<String> {
        read_asset(&self.dml)
    }
}

fn read_asset(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| EtlError::SqlAsset {
        path: path.to_path_buf(),
        source,
    })
}
