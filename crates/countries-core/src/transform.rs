// crates/countries-core/src/transform.rs

//! # Record Transformer
//!
//! Raw (nested JSON) -> [`FlatCountryRow`] (17 positional columns).
//!
//! The mapping never fails. Missing keys, `null`s and nested maps that are
//! absent all degrade to the column default. A field that is *present* with
//! an unexpected JSON type is also defaulted, but a warning is logged so one
//! odd record neither aborts the batch nor disappears silently.

use crate::raw::{empty_object, field, kind_of, RawCountry};
use crate::row::{FlatCountryRow, LIST_SEPARATOR, UNKNOWN_CAPITAL};
use serde_json::{Map, Value};
use tracing::warn;

/// **Standard Converter:** Raw -> Flat.
pub fn transform_country(country: &RawCountry) -> FlatCountryRow {
    let f = Fields { country };

    let name = f.object("name", country.get("name"));
    let currencies = f.object("currencies", country.get("currencies"));
    let idd = f.object("idd", country.get("idd"));
    let native_names = f.object("name.nativeName", field(name, "nativeName"));

    FlatCountryRow {
        common_name: f.string("name.common", field(name, "common")),
        official_name: f.string("name.official", field(name, "official")),
        native_names: join(
            native_names
                .values()
                .map(|native| member_str(native, "common")),
        ),
        currency_codes: join(currencies.keys().map(String::as_str)),
        currency_names: join(currencies.values().map(|c| member_str(c, "name"))),
        currency_symbols: join(currencies.values().map(|c| member_str(c, "symbol"))),
        calling_codes: f.calling_codes(idd),
        capital_cities: f.capital(),
        region: f.string("region", country.get("region")),
        subregion: f.string("subregion", country.get("subregion")),
        languages: join(f.strings(
            "languages",
            f.object("languages", country.get("languages")).values(),
        )),
        area: f.float("area", country.get("area")).unwrap_or(0.0),
        population: f.integer("population", country.get("population")).unwrap_or(0),
        continents: join(f.strings(
            "continents",
            f.array("continents", country.get("continents")),
        )),
        independent: f.boolean("independent", country.get("independent")),
        un_member: f.boolean("unMember", country.get("unMember")),
        start_of_week: f.string("startOfWeek", country.get("startOfWeek")),
    }
}

/// Transforms a whole batch, preserving order.
pub fn transform_all(countries: &[RawCountry]) -> Vec<FlatCountryRow> {
    countries.iter().map(transform_country).collect()
}

// -----------------------------------------------------------------------------
// INTERNAL HELPERS
// -----------------------------------------------------------------------------

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(LIST_SEPARATOR)
}

/// `value[key]` as a string, `""` if either level is missing.
fn member_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value
        .as_object()
        .and_then(|obj| field(obj, key))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Typed accessors bound to one record, so shape warnings can name it.
struct Fields<'a> {
    country: &'a RawCountry,
}

impl<'a> Fields<'a> {
    fn mismatch(&self, path: &str, expected: &str, found: &Value) {
        warn!(
            country = self.country.label(),
            field = path,
            expected,
            found = kind_of(found),
            "unexpected field type, substituting default"
        );
    }

    fn object(&self, path: &str, value: Option<&'a Value>) -> &'a Map<String, Value> {
        match value {
            Some(Value::Object(obj)) => obj,
            Some(other) => {
                self.mismatch(path, "an object", other);
                empty_object()
            }
            None => empty_object(),
        }
    }

    fn array(&self, path: &str, value: Option<&'a Value>) -> &'a [Value] {
        match value {
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.mismatch(path, "an array", other);
                &[]
            }
            None => &[],
        }
    }

    /// String entries of a list; any other entry is skipped with a warning.
    fn strings(
        &self,
        path: &str,
        values: impl IntoIterator<Item = &'a Value>,
    ) -> impl Iterator<Item = &'a str> {
        let mut kept = Vec::new();
        for value in values {
            match value.as_str() {
                Some(s) => kept.push(s),
                None => self.mismatch(path, "a string entry", value),
            }
        }
        kept.into_iter()
    }

    fn string(&self, path: &str, value: Option<&Value>) -> Option<String> {
        match value? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.mismatch(path, "a string", other);
                None
            }
        }
    }

    fn boolean(&self, path: &str, value: Option<&Value>) -> Option<bool> {
        match value? {
            Value::Bool(b) => Some(*b),
            other => {
                self.mismatch(path, "a boolean", other);
                None
            }
        }
    }

    fn float(&self, path: &str, value: Option<&Value>) -> Option<f64> {
        let value = value?;
        let parsed = value.as_f64();
        if parsed.is_none() {
            self.mismatch(path, "a number", value);
        }
        parsed
    }

    fn integer(&self, path: &str, value: Option<&Value>) -> Option<i64> {
        let value = value?;
        let parsed = value
            .as_i64()
            .or_else(|| value.as_f64().map(|n| n as i64));
        if parsed.is_none() {
            self.mismatch(path, "a number", value);
        }
        parsed
    }

    /// `idd.root + suffix` per suffix. Blank (not "Unknown") without suffixes.
    fn calling_codes(&self, idd: &'a Map<String, Value>) -> String {
        let suffixes = self.array("idd.suffixes", field(idd, "suffixes"));
        if suffixes.is_empty() {
            return String::new();
        }
        let root = field(idd, "root").and_then(Value::as_str).unwrap_or("");
        self.strings("idd.suffixes", suffixes)
            .map(|suffix| format!("{root}{suffix}"))
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR)
    }

    /// Joined capitals, or the literal "Unknown" when absent or empty.
    fn capital(&self) -> String {
        match self.country.get("capital") {
            Some(Value::Array(items)) if !items.is_empty() => {
                let joined = join(self.strings("capital", items));
                if joined.is_empty() {
                    UNKNOWN_CAPITAL.to_string()
                } else {
                    joined
                }
            }
            // Some older snapshots carry a single string.
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Array(_)) | Some(Value::String(_)) | None => UNKNOWN_CAPITAL.to_string(),
            Some(other) => {
                self.mismatch("capital", "an array", other);
                UNKNOWN_CAPITAL.to_string()
            }
        }
    }
}
