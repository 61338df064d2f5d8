// crates/countries-core/src/lib.rs

pub mod config;
pub mod error;
pub mod pipeline; // Orchestrator
pub mod row; // Flat 17-column output row
pub mod source; // Cache + remote acquisition
pub mod store; // Persistence adapter(s)
pub mod transform;
// Loosely-typed input shared by source and transform
pub mod raw;

// Re-exports
pub use crate::config::EtlConfig;
pub use crate::error::{EtlError, Result};
pub use crate::pipeline::{Pipeline, RunSummary};
pub use crate::raw::{CountriesRaw, RawCountry};
pub use crate::row::{FlatCountryRow, COLUMNS};
pub use crate::source::{CountrySource, Fetch, JsonCache, Offline, RecordSource};
pub use crate::store::{Connect, CountryTable, Database, MemoryConnector, MemoryDatabase, SqlAssets};
pub use crate::transform::{transform_all, transform_country};

#[cfg(all(feature = "fetch", feature = "postgres"))]
pub use crate::pipeline::DefaultPipeline;
#[cfg(feature = "fetch")]
pub use crate::source::RemoteSource;
#[cfg(feature = "postgres")]
pub use crate::store::PgConnector;
