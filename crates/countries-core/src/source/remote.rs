// crates/countries-core/src/source/remote.rs
#![cfg(feature = "fetch")]

use super::merge::merge_positional;
use super::Fetch;
use crate::config::Endpoints;
use crate::error::{EtlError, Result};
use crate::raw::{records_from_value, CountriesRaw};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

/// Blocking client for the two REST Countries endpoints.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    endpoints: Endpoints,
}

impl RemoteSource {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(EtlError::HttpClient)?;
        Ok(Self::with_client(client, endpoints))
    }

    pub fn with_client(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    fn fetch_records(&self, url: &str) -> Result<CountriesRaw> {
        debug!(url, "requesting");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|source| EtlError::Fetch {
                url: url.to_string(),
                source,
            })?;
        let value: Value = serde_json::from_reader(response)?;
        records_from_value(value)
    }
}

impl Fetch for RemoteSource {
    /// Sequential: primary first, then secondary, then positional merge.
    fn fetch(&self) -> Result<CountriesRaw> {
        let first = self.fetch_records(&self.endpoints.primary)?;
        let second = self.fetch_records(&self.endpoints.secondary)?;
        info!(
            primary = first.len(),
            secondary = second.len(),
            "fetched country data from both endpoints"
        );
        Ok(merge_positional(first, second))
    }
}
