//! Ranking and lookup over an ingested record collection.
//!
//! Every query takes records in scan order and resolves ties in favour of
//! the record seen first.

use itertools::Itertools;
use log::debug;

use crate::record::CountryRecord;

/// Records with emissions in `year`, highest first, at most `limit` of them.
pub fn top_polluters(records: &[CountryRecord], year: i32, limit: usize) -> Vec<&CountryRecord> {
    let mut ranked = records
        .iter()
        .filter(|record| record.emissions_for(year) > 0)
        .collect::<Vec<_>>();
    let qualifying = ranked.len();
    // Stable sort keeps scan order between equal values.
    ranked.sort_by(|a, b| b.emissions_for(year).cmp(&a.emissions_for(year)));
    ranked.truncate(limit);
    debug!(
        "top_polluters: {qualifying} record(s) with data for {year}, returning {}",
        ranked.len()
    );
    ranked
}

/// Ranking for `preferred`, stepping back one year at a time down to `floor`
/// until a year with data is found.
///
/// Returns the year whose ranking was produced alongside the ranking. When
/// no year in the range has data the ranking is empty and the year is
/// `preferred`.
pub fn top_polluters_with_fallback(
    records: &[CountryRecord],
    preferred: i32,
    floor: i32,
    limit: usize,
) -> (i32, Vec<&CountryRecord>) {
    let ranked = top_polluters(records, preferred, limit);
    if !ranked.is_empty() {
        return (preferred, ranked);
    }
    for year in (floor..preferred).rev() {
        let ranked = top_polluters(records, year, limit);
        if !ranked.is_empty() {
            debug!("Using year {year} instead of {preferred}");
            return (year, ranked);
        }
    }
    (preferred, Vec::new())
}

pub fn highest_emitter(records: &[CountryRecord], year: i32) -> Option<&CountryRecord> {
    let mut highest = None;
    let mut max_tons = 0;
    for record in records {
        let tons = record.emissions_for(year);
        if tons > max_tons {
            max_tons = tons;
            highest = Some(record);
        }
    }
    match highest {
        Some(record) => debug!(
            "highest_emitter {year}: {} ({max_tons} tons)",
            record.name()
        ),
        None => debug!("highest_emitter {year}: none"),
    }
    highest
}

/// First record whose name contains `query`, ignoring case.
///
/// A blank query matches nothing.
pub fn find_by_name<'a>(records: &'a [CountryRecord], query: &str) -> Option<&'a CountryRecord> {
    if query.trim().is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    let found = records
        .iter()
        .find(|record| record.name().to_lowercase().contains(&needle));
    match found {
        Some(record) => debug!("find_by_name '{query}': matched {}", record.name()),
        None => debug!(
            "find_by_name '{query}': no match among {} record(s), e.g. {}",
            records.len(),
            records.iter().take(10).map(CountryRecord::name).join(", ")
        ),
    }
    found
}
