// crates/countries-core/src/store/pg.rs
#![cfg(feature = "postgres")]

use super::{Connect, CountryTable, Database};
use crate::config::DbConfig;
use crate::error::{EtlError, Result};
use crate::row::{FlatCountryRow, COLUMN_COUNT};
use postgres::types::ToSql;
use postgres::{Client, NoTls, Row, Transaction};
use tracing::{debug, info};

/// Opens blocking PostgreSQL connections from a [`DbConfig`].
#[derive(Debug, Clone)]
pub struct PgConnector {
    config: DbConfig,
}

impl PgConnector {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    fn pg_config(&self) -> postgres::Config {
        let mut pg = postgres::Config::new();
        pg.host(&self.config.host)
            .port(self.config.port)
            .dbname(&self.config.dbname)
            .application_name(env!("CARGO_PKG_NAME"));
        if let Some(user) = &self.config.user {
            pg.user(user);
        }
        if let Some(password) = &self.config.password {
            pg.password(password);
        }
        pg
    }
}

impl Connect for PgConnector {
    type Conn = Client;

    fn connect(&self) -> Result<Client> {
        let target = self.config.target();
        let client = self
            .pg_config()
            .connect(NoTls)
            .map_err(|e| EtlError::ConnectionFailure {
                target: target.clone(),
                source: Box::new(e),
            })?;
        info!(%target, "connected to database");
        Ok(client)
    }
}

impl Database for Client {
    type Tx<'a> = Transaction<'a>;

    fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(Client::transaction(self)?)
    }
}

impl CountryTable for Transaction<'_> {
    fn ensure_table(&mut self, ddl: &str) -> Result<()> {
        self.batch_execute(ddl)?;
        Ok(())
    }

    fn bulk_insert(&mut self, dml: &str, rows: &[FlatCountryRow]) -> Result<u64> {
        let statement = self.prepare(dml)?;
        let mut affected = 0;
        for row in rows {
            affected += self.execute(&statement, &row_params(row))?;
        }
        debug!(submitted = rows.len(), affected, "bulk insert executed");
        Ok(rows.len() as u64)
    }

    fn commit(self) -> Result<()> {
        Transaction::commit(self)?;
        Ok(())
    }
}

/// Positional parameters `$1..$17`, in column order.
pub fn row_params(row: &FlatCountryRow) -> [&(dyn ToSql + Sync); COLUMN_COUNT] {
    [
        &row.common_name,
        &row.official_name,
        &row.native_names,
        &row.currency_codes,
        &row.currency_names,
        &row.currency_symbols,
        &row.calling_codes,
        &row.capital_cities,
        &row.region,
        &row.subregion,
        &row.languages,
        &row.area,
        &row.population,
        &row.continents,
        &row.independent,
        &row.un_member,
        &row.start_of_week,
    ]
}

/// Inverse of [`row_params`] for a `SELECT` of the 17 columns in order.
pub fn row_from(row: &Row) -> Result<FlatCountryRow> {
    Ok(FlatCountryRow {
        common_name: row.try_get(0)?,
        official_name: row.try_get(1)?,
        native_names: row.try_get(2)?,
        currency_codes: row.try_get(3)?,
        currency_names: row.try_get(4)?,
        currency_symbols: row.try_get(5)?,
        calling_codes: row.try_get(6)?,
        capital_cities: row.try_get(7)?,
        region: row.try_get(8)?,
        subregion: row.try_get(9)?,
        languages: row.try_get(10)?,
        area: row.try_get(11)?,
        population: row.try_get(12)?,
        continents: row.try_get(13)?,
        independent: row.try_get(14)?,
        un_member: row.try_get(15)?,
        start_of_week: row.try_get(16)?,
    })
}

/// Runs `query` (which must select the 17 columns in order) and maps rows back.
pub fn read_rows(client: &mut Client, query: &str) -> Result<Vec<FlatCountryRow>> {
    client.query(query, &[])?.iter().map(row_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::COLUMNS;
    use serde_json::Value;

    /// Every field carries a value no other field shares.
    fn distinct_row() -> FlatCountryRow {
        let text = |column: &str| format!("v:{column}");
        FlatCountryRow {
            common_name: Some(text("common_name")),
            official_name: Some(text("official_name")),
            native_names: text("native_names"),
            currency_codes: text("currency_codes"),
            currency_names: text("currency_names"),
            currency_symbols: text("currency_symbols"),
            calling_codes: text("calling_codes"),
            capital_cities: text("capital_cities"),
            region: Some(text("region")),
            subregion: Some(text("subregion")),
            languages: text("languages"),
            area: 12.5,
            population: 4242,
            continents: text("continents"),
            independent: Some(true),
            un_member: Some(false),
            start_of_week: Some(text("start_of_week")),
        }
    }

    #[test]
    fn params_bind_in_column_order() {
        let row = distinct_row();
        let params = row_params(&row);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(params.len(), COLUMNS.len());
        for (position, (param, column)) in params.iter().zip(COLUMNS).enumerate() {
            let bound = format!("{param:?}");
            let expected = json[column].to_string();
            assert!(
                bound.contains(&expected),
                "${} binds {bound}, expected the value of `{column}` ({expected})",
                position + 1
            );
        }
    }

    #[test]
    fn distinct_row_has_no_shared_values() {
        let json = serde_json::to_value(distinct_row()).unwrap();
        let rendered: Vec<String> = COLUMNS.iter().map(|c| json[*c].to_string()).collect();
        for (i, a) in rendered.iter().enumerate() {
            for b in rendered.iter().skip(i + 1) {
                assert!(!a.contains(b.as_str()) && !b.contains(a.as_str()), "{a} / {b}");
            }
            assert_ne!(json[COLUMNS[i]], Value::Null);
        }
    }
}
