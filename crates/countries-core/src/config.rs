// crates/countries-core/src/config.rs

//! # Configuration
//!
//! One explicit [`EtlConfig`] is built per run and handed to the adapters.
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults (REST Countries endpoints, local PostgreSQL, relative paths)
//! 2. optional TOML file (`countries-etl.toml`, or `$COUNTRIES_ETL_CONFIG`)
//! 3. environment, prefix `COUNTRIES_ETL`, separator `__`
//!    (e.g. `COUNTRIES_ETL__DATABASE__HOST=db.internal`)
//!
//! Database credentials missing from all layers are read from the
//! credentials file (`USER` / `PASSWORD`, dotenv syntax), then from the
//! process environment.

use crate::error::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_PATH_VAR: &str = "COUNTRIES_ETL_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "countries-etl.toml";
pub const ENV_PREFIX: &str = "COUNTRIES_ETL";

/// The REST Countries API caps `fields` at 10 per request, hence two calls.
pub const PRIMARY_URL: &str = "https://restcountries.com/v3.1/all?fields=name,currencies,idd,capital,region,subregion,languages,area,population,continents";
pub const SECONDARY_URL: &str =
    "https://restcountries.com/v3.1/all?fields=independent,unMember,startOfWeek";

pub const DEFAULT_CACHE_PATH: &str = "countries_raw.json";
pub const DEFAULT_DDL_PATH: &str = "./ddl_commands/create_countries.sql";
pub const DEFAULT_DML_PATH: &str = "./dml_commands/insert_countries.sql";
pub const DEFAULT_CREDENTIALS_FILE: &str = "my_creds.env";

#[derive(Debug, Clone, Deserialize)]
pub struct EtlConfig {
    pub endpoints: Endpoints,
    pub database: DbConfig,
    pub paths: Paths,
    /// Cache-first when `true`; always fetch when `false`.
    pub use_cache: bool,
}

/// The two endpoints whose responses are merged position by position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoints {
    pub primary: String,
    pub secondary: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            primary: PRIMARY_URL.to_string(),
            secondary: SECONDARY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    pub cache: PathBuf,
    pub ddl: PathBuf,
    pub dml: PathBuf,
}

#[derive(Clone, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub credentials_file: Option<PathBuf>,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("credentials_file", &self.credentials_file)
            .finish()
    }
}

impl DbConfig {
    /// `user@host:port/dbname`, for logs and error messages.
    pub fn target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user.as_deref().unwrap_or("<no user>"),
            self.host,
            self.port,
            self.dbname
        )
    }

    /// Fills `user` / `password` from the credentials file, then from the
    /// process environment. Values already set by config layers win.
    pub fn resolve_credentials(&mut self) {
        if self.user.is_some() && self.password.is_some() {
            return;
        }

        let from_file = self
            .credentials_file
            .as_deref()
            .map(read_credentials_file)
            .unwrap_or_default();
        let lookup =
            |key: &str| from_file.get(key).cloned().or_else(|| std::env::var(key).ok());

        if self.user.is_none() {
            self.user = lookup("USER");
        }
        if self.password.is_none() {
            self.password = lookup("PASSWORD");
        }
    }
}

/// Parses a dotenv file without touching the process environment, so a
/// `USER` set by the login shell cannot shadow the file's value.
fn read_credentials_file(path: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    match dotenvy::from_filename_iter(path) {
        Ok(iter) => {
            for item in iter {
                match item {
                    Ok((key, value)) => {
                        vars.insert(key, value);
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping malformed credentials line"),
                }
            }
        }
        Err(e) if e.not_found() => {
            debug!(path = %path.display(), "no credentials file, using process environment");
        }
        Err(e) => warn!(path = %path.display(), error = %e, "credentials file unreadable"),
    }
    vars
}

impl EtlConfig {
    /// Loads from `$COUNTRIES_ETL_CONFIG` (must exist) or `./countries-etl.toml` (optional).
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_PATH_VAR) {
            Some(file) => Self::load_file(Path::new(&file), true),
            None => Self::load_file(Path::new(DEFAULT_CONFIG_FILE), false),
        }
    }

    /// Loads with an explicit config file path; a missing file means defaults + env.
    pub fn load_from(file: &Path) -> Result<Self> {
        Self::load_file(file, false)
    }

    fn load_file(file: &Path, required: bool) -> Result<Self> {
        let mut config: EtlConfig = Self::builder()?
            .add_source(File::from(file).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        config.database.resolve_credentials();
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            .set_default("endpoints.primary", PRIMARY_URL)?
            .set_default("endpoints.secondary", SECONDARY_URL)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432_i64)?
            .set_default("database.dbname", "countries_db")?
            .set_default("database.credentials_file", DEFAULT_CREDENTIALS_FILE)?
            .set_default("paths.cache", DEFAULT_CACHE_PATH)?
            .set_default("paths.ddl", DEFAULT_DDL_PATH)?
            .set_default("paths.dml", DEFAULT_DML_PATH)?
            .set_default("use_cache", true)?;
        Ok(builder)
    }
}
