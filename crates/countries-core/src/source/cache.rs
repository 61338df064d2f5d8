// crates/countries-core/src/source/cache.rs

//! Local JSON snapshot of the merged API response.
//!
//! Written after every successful fetch, read before a fetch is attempted,
//! never invalidated automatically. Delete the file to force a refresh.

use super::common_io;
use crate::error::{EtlError, Result};
use crate::raw::{records_from_value, CountriesRaw, RawCountry};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonCache {
    path: PathBuf,
}

impl JsonCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when there is no cache file yet.
    pub fn read(&self) -> Result<Option<CountriesRaw>> {
        let reader = match common_io::open_stream(&self.path) {
            Ok(reader) => reader,
            Err(EtlError::Io(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let value: Value = serde_json::from_reader(reader)?;
        let records = records_from_value(value)?;
        debug!(path = %self.path.display(), count = records.len(), "cache read");
        Ok(Some(records))
    }

    /// Pretty-printed (4-space indent), UTF-8, non-ASCII kept as-is.
    pub fn write(&self, records: &[RawCountry]) -> Result<()> {
        common_io::write_stream(&self.path, |writer| {
            let mut ser =
                serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
            records.serialize(&mut ser)?;
            Ok(())
        })?;
        debug!(path = %self.path.display(), count = records.len(), "cache written");
        Ok(())
    }
}
