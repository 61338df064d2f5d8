// crates/countries-core/src/source/mod.rs

//! # Data Source Adapter
//!
//! Cache-first acquisition of raw country records:
//!
//! 1. if allowed, read the local JSON snapshot;
//! 2. otherwise (or if it is missing/unreadable/empty) fetch both endpoints
//!    and merge them positionally;
//! 3. persist a successful fetch back to the snapshot.
//!
//! Failures never escape [`RecordSource::load`]: they are logged and the
//! result is empty, and the orchestrator decides that empty is fatal.

pub mod cache;
pub mod common_io;
pub mod merge;
#[cfg(feature = "fetch")]
pub mod remote;

pub use cache::JsonCache;
pub use merge::merge_positional;
#[cfg(feature = "fetch")]
pub use remote::RemoteSource;

use crate::error::Result;
use crate::raw::CountriesRaw;
use tracing::{error, info, warn};

/// Where fresh (non-cached) records come from.
pub trait Fetch {
    fn fetch(&self) -> Result<CountriesRaw>;
}

/// What the orchestrator needs from a data source.
pub trait RecordSource {
    /// Never fails; an empty result means "no usable data".
    fn load(&self, use_cache: bool) -> CountriesRaw;
}

/// A fetcher that never goes to the network. Cache-only runs and demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Fetch for Offline {
    fn fetch(&self) -> Result<CountriesRaw> {
        info!("offline source, nothing to fetch");
        Ok(Vec::new())
    }
}

/// The cache in front of a [`Fetch`] implementation.
#[derive(Debug, Clone)]
pub struct CountrySource<F> {
    cache: JsonCache,
    fetcher: F,
}

impl<F: Fetch> CountrySource<F> {
    pub fn new(cache: JsonCache, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &JsonCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Snapshot contents, if present, parseable and non-empty.
    pub fn load_cached(&self) -> Option<CountriesRaw> {
        let path = self.cache.path().display();
        match self.cache.read() {
            Ok(Some(records)) if !records.is_empty() => {
                info!(%path, count = records.len(), "loaded country data from cache");
                Some(records)
            }
            Ok(Some(_)) => {
                info!(%path, "cache file is empty");
                None
            }
            Ok(None) => {
                info!(%path, "cache file not found");
                None
            }
            Err(e) => {
                warn!(%path, error = %e, "failed to load cache");
                None
            }
        }
    }

    /// Fetches fresh data and refreshes the snapshot. Empty on failure.
    pub fn fetch_fresh(&self) -> CountriesRaw {
        info!("fetching fresh data from API");
        let records = match self.fetcher.fetch() {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "failed to fetch country data");
                return Vec::new();
            }
        };

        if records.is_empty() {
            warn!("fetch returned no records, cache left untouched");
            return records;
        }
        match self.cache.write(&records) {
            Ok(()) => info!(
                path = %self.cache.path().display(),
                count = records.len(),
                "data saved to cache"
            ),
            Err(e) => warn!(
                path = %self.cache.path().display(),
                error = %e,
                "failed to write cache, continuing with fetched data"
            ),
        }
        records
    }
}

impl<F: Fetch> RecordSource for CountrySource<F> {
    fn load(&self, use_cache: bool) -> CountriesRaw {
        if use_cache {
            if let Some(records) = self.load_cached() {
                return records;
            }
        }
        self.fetch_fresh()
    }
}

#[cfg(feature = "fetch")]
impl CountrySource<RemoteSource> {
    /// Cache at `paths.cache` in front of the configured endpoints.
    pub fn from_config(config: &crate::config::EtlConfig) -> Result<Self> {
        let remote = RemoteSource::new(config.endpoints.clone())?;
        Ok(Self::new(JsonCache::new(&config.paths.cache), remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;
    use crate::raw::RawCountry;
    use serde_json::json;
    use std::cell::Cell;

    /// Scripted fetcher that counts its calls.
    struct Scripted {
        result: fn() -> Result<CountriesRaw>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(result: fn() -> Result<CountriesRaw>) -> Self {
            Self {
                result,
                calls: Cell::new(0),
            }
        }
    }

    impl Fetch for Scripted {
        fn fetch(&self) -> Result<CountriesRaw> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    fn fresh() -> Result<CountriesRaw> {
        Ok(vec![
            RawCountry::from_value(json!({"name": {"common": "Fresh"}})).unwrap(),
        ])
    }

    fn failing() -> Result<CountriesRaw> {
        Err(EtlError::InvalidData("connection reset".into()))
    }

    fn cached() -> CountriesRaw {
        vec![RawCountry::from_value(json!({"name": {"common": "Cached"}})).unwrap()]
    }

    fn labels(records: &[RawCountry]) -> Vec<&str> {
        records.iter().map(RawCountry::label).collect()
    }

    #[test]
    fn cache_hit_skips_the_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path().join("countries_raw.json"));
        cache.write(&cached()).unwrap();

        let source = CountrySource::new(cache, Scripted::new(fresh));
        assert_eq!(labels(&source.load(true)), ["Cached"]);
        assert_eq!(source.fetcher().calls.get(), 0);
    }

    #[test]
    fn cache_is_ignored_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path().join("countries_raw.json"));
        cache.write(&cached()).unwrap();

        let source = CountrySource::new(cache, Scripted::new(fresh));
        assert_eq!(labels(&source.load(false)), ["Fresh"]);
        assert_eq!(source.fetcher().calls.get(), 1);
    }

    #[test]
    fn cache_miss_fetches_and_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path().join("countries_raw.json"));

        let source = CountrySource::new(cache, Scripted::new(fresh));
        assert_eq!(labels(&source.load(true)), ["Fresh"]);

        let snapshot = source.cache().read().unwrap().unwrap();
        assert_eq!(labels(&snapshot), ["Fresh"]);
    }

    #[test]
    fn unreadable_or_empty_cache_falls_back_to_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries_raw.json");

        for contents in ["not json", "[]", "{\"a\": 1}"] {
            std::fs::write(&path, contents).unwrap();
            let source = CountrySource::new(JsonCache::new(&path), Scripted::new(fresh));
            assert_eq!(labels(&source.load(true)), ["Fresh"], "contents: {contents}");
        }
    }

    #[test]
    fn fetch_failure_yields_empty_and_keeps_cache_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path().join("countries_raw.json"));

        let source = CountrySource::new(cache, Scripted::new(failing));
        assert!(source.load(true).is_empty());
        assert!(!source.cache().path().exists());
    }

    #[test]
    fn offline_source_without_cache_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = CountrySource::new(JsonCache::new(dir.path().join("none.json")), Offline);
        assert!(source.load(true).is_empty());
    }
}
