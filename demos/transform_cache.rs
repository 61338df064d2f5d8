//! Dry run of countries-etl against a cache snapshot
//!
//! Reads `countries_raw.json` (or the path given as first argument), runs the
//! full pipeline against an in-memory database and prints the flattened rows.
//! No network access, no PostgreSQL.
//!
//!   $ cargo run --example transform_cache -- path/to/countries_raw.json

use countries_core::{
    CountrySource, JsonCache, MemoryConnector, MemoryDatabase, Offline, Pipeline, Result,
    SqlAssets, COLUMNS,
};

fn main() -> Result<()> {
    println!("=== countries-etl dry run ===\n");

    let cache_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "countries_raw.json".to_string());
    let source = CountrySource::new(JsonCache::new(&cache_path), Offline);

    let db = MemoryDatabase::new();
    let pipeline = Pipeline::new(
        source,
        MemoryConnector::new(db.clone()),
        SqlAssets::new(
            "./ddl_commands/create_countries.sql",
            "./dml_commands/insert_countries.sql",
        ),
        true,
    );

    let summary = match pipeline.run() {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("✗ Dry run failed for {cache_path}: {e}");
            return Err(e);
        }
    };
    println!(
        "✓ {} records read, {} rows loaded\n",
        summary.fetched, summary.inserted
    );

    println!("Columns: {}\n", COLUMNS.join(", "));
    for row in db.rows() {
        println!("{}", serde_json::to_string(&row)?);
    }

    Ok(())
}
