// crates/countries-core/src/row.rs
use serde::{Deserialize, Serialize};

/// Separator used for every multi-valued column.
pub const LIST_SEPARATOR: &str = ", ";

/// Capital placeholder. The only column whose default is not blank/null.
pub const UNKNOWN_CAPITAL: &str = "Unknown";

pub const COLUMN_COUNT: usize = 17;

/// Target table columns, in the exact order the DML template binds them.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "common_name",
    "official_name",
    "native_names",
    "currency_codes",
    "currency_names",
    "currency_symbols",
    "calling_codes",
    "capital_cities",
    "region",
    "subregion",
    "languages",
    "area",
    "population",
    "continents",
    "independent",
    "un_member",
    "start_of_week",
];

/// One flattened country, ready for the `countries` table.
///
/// The contract with the table is **positional**: fields are declared (and
/// serialized, and bound as `$1..$17`) in [`COLUMNS`] order. Do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCountryRow {
    pub common_name: Option<String>,
    pub official_name: Option<String>,
    pub native_names: String,
    pub currency_codes: String,
    pub currency_names: String,
    pub currency_symbols: String,
    pub calling_codes: String,
    pub capital_cities: String,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub languages: String,
    /// km², may be fractional in the source
    pub area: f64,
    pub population: i64,
    pub continents: String,
    pub independent: Option<bool>,
    pub un_member: Option<bool>,
    pub start_of_week: Option<String>,
}

impl Default for FlatCountryRow {
    /// The row produced for an empty record.
    fn default() -> Self {
        Self {
            common_name: None,
            official_name: None,
            native_names: String::new(),
            currency_codes: String::new(),
            currency_names: String::new(),
            currency_symbols: String::new(),
            calling_codes: String::new(),
            capital_cities: UNKNOWN_CAPITAL.to_string(),
            region: None,
            subregion: None,
            languages: String::new(),
            area: 0.0,
            population: 0,
            continents: String::new(),
            independent: None,
            un_member: None,
            start_of_week: None,
        }
    }
}
