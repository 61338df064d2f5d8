// crates/countries-core/src/source/merge.rs
use crate::raw::CountriesRaw;
use tracing::warn;

/// Pairs the two endpoint responses by index and shallow-merges each pair.
///
/// - Result length is `min(first.len(), second.len())`; the surplus of the
///   longer list is dropped.
/// - On key collision the value from `second` wins.
pub fn merge_positional(first: CountriesRaw, second: CountriesRaw) -> CountriesRaw {
    let len = first.len().min(second.len());
    if first.len() != second.len() {
        warn!(
            first = first.len(),
            second = second.len(),
            kept = len,
            "endpoint responses differ in length, truncating to the shorter"
        );
    }

    let mut first = first.into_iter();
    let mut second = second.into_iter();
    let mut merged = Vec::with_capacity(len);
    for _ in 0..len {
        let (Some(mut country), Some(extra)) = (first.next(), second.next()) else {
            break;
        };
        country.merge_from(extra);
        merged.push(country);
    }
    merged
}
