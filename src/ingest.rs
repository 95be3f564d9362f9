//! One-pass ingestion of the emissions dataset.
//!
//! The source is a comma-delimited file with a single header row and nine
//! columns per data row:
//!
//! ```text
//! Country,Code,Calling Code,Year,CO2 emission (Tons),Population(2022),Area,% of World,Density(km2)
//! ```
//!
//! Quoting is not supported; every comma splits a field. Rows are handled
//! independently:
//!
//! - blank lines are skipped,
//! - rows with fewer than nine fields or an unparseable year are discarded
//!   as malformed,
//! - unparseable emissions or population degrade to zero.
//!
//! Static attributes come from the first row seen for a country. Later rows
//! for the same country only contribute emissions.

use std::{collections::HashMap, path::Path};

use encoding_rs::Encoding;
use log::{debug, error, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::{io_utils, record::CountryRecord};

pub const FIELD_COUNT: usize = 9;

const COUNTRY_FIELD: usize = 0;
const YEAR_FIELD: usize = 3;
const EMISSIONS_FIELD: usize = 4;
const POPULATION_FIELD: usize = 5;
const PERCENTAGE_FIELD: usize = 7;
const DENSITY_FIELD: usize = 8;

const PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("line {line} has insufficient columns: {found} (expected {})", FIELD_COUNT)]
    InsufficientColumns { line: usize, found: usize },
    #[error("line {line} has an invalid year '{value}'")]
    InvalidYear { line: usize, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub lines_read: usize,
    pub processed_rows: usize,
    pub malformed_rows: usize,
    pub degraded_fields: usize,
}

/// Records produced by one ingestion pass, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<CountryRecord>,
    index: HashMap<String, usize>,
    stats: IngestStats,
}

impl RecordSet {
    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CountryRecord> {
        self.records
    }

    pub fn get(&self, name: &str) -> Option<&CountryRecord> {
        self.index.get(name).map(|idx| &self.records[*idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Earliest and latest year with data across every record.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        self.records
            .iter()
            .filter_map(CountryRecord::year_span)
            .reduce(|(lo, hi), (first, last)| (lo.min(first), hi.max(last)))
    }

    fn entry(&mut self, row: &ParsedRow<'_>) -> &mut CountryRecord {
        let idx = match self.index.get(row.country).copied() {
            Some(idx) => idx,
            None => {
                let idx = self.records.len();
                self.records.push(CountryRecord::new(
                    row.country,
                    row.population,
                    row.percentage_of_world,
                    row.density,
                ));
                self.index.insert(row.country.to_string(), idx);
                idx
            }
        };
        &mut self.records[idx]
    }
}

#[derive(Debug)]
struct ParsedRow<'a> {
    country: &'a str,
    year: i32,
    tons: u64,
    population: u64,
    percentage_of_world: &'a str,
    density: &'a str,
    degraded: usize,
}

fn parse_row(line_number: usize, line: &str) -> Result<ParsedRow<'_>, RowError> {
    let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
    if fields.len() < FIELD_COUNT {
        return Err(RowError::InsufficientColumns {
            line: line_number,
            found: fields.len(),
        });
    }
    let year = fields[YEAR_FIELD]
        .parse::<i32>()
        .map_err(|_| RowError::InvalidYear {
            line: line_number,
            value: fields[YEAR_FIELD].to_string(),
        })?;

    let mut degraded = 0;
    let tons = parse_truncated(fields[EMISSIONS_FIELD]).unwrap_or_else(|| {
        degraded += 1;
        0
    });
    let population = parse_truncated(fields[POPULATION_FIELD]).unwrap_or_else(|| {
        degraded += 1;
        0
    });

    Ok(ParsedRow {
        country: fields[COUNTRY_FIELD],
        year,
        tons,
        population,
        percentage_of_world: fields[PERCENTAGE_FIELD],
        density: fields[DENSITY_FIELD],
        degraded,
    })
}

/// Parses a finite decimal value and truncates it toward zero. Negative
/// values clamp to 0; `inf` and `nan` spellings do not parse.
fn parse_truncated(raw: &str) -> Option<u64> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as u64)
}

/// Builds the record collection from the lines of a source, header included.
pub fn parse_lines<I, S>(lines: I) -> RecordSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = RecordSet::default();
    let mut header_seen = false;

    for (idx, line) in lines.into_iter().enumerate() {
        let line_number = idx + 1;
        let line = line.as_ref();
        set.stats.lines_read += 1;
        if line.trim().is_empty() {
            continue;
        }
        if !header_seen {
            debug!("Header: {line}");
            header_seen = true;
            continue;
        }

        let row = match parse_row(line_number, line) {
            Ok(row) => row,
            Err(err) => {
                warn!("Skipping row: {err}");
                set.stats.malformed_rows += 1;
                continue;
            }
        };
        set.stats.degraded_fields += row.degraded;
        let (year, tons) = (row.year, row.tons);
        set.entry(&row).add_emission(year, tons);
        set.stats.processed_rows += 1;

        if set.stats.processed_rows % PROGRESS_INTERVAL == 0 {
            debug!(
                "Processed {} row(s), found {} country record(s)",
                set.stats.processed_rows,
                set.records.len()
            );
        }
    }

    info!(
        "Parsed {} country record(s) from {} data row(s) ({} malformed)",
        set.records.len(),
        set.stats.processed_rows,
        set.stats.malformed_rows
    );
    set
}

/// Loads records from `path`, returning an empty set when the source cannot
/// be opened or read. Undecodable bytes become U+FFFD and the affected rows
/// still load.
pub fn load_records(path: &Path, encoding: &'static Encoding) -> RecordSet {
    match io_utils::read_source(path, encoding) {
        Ok(text) => parse_lines(text.lines()),
        Err(err) => {
            error!("Error reading source {path:?}: {err:#}");
            RecordSet::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Country,Code,Calling Code,Year,CO2 emission (Tons),Population(2022),Area,% of World,Density(km2)";

    #[test]
    fn parse_row_reports_short_rows() {
        let err = parse_row(7, "A,B,C,2020,1").unwrap_err();
        assert_eq!(err, RowError::InsufficientColumns { line: 7, found: 5 });
    }

    #[test]
    fn parse_row_rejects_bad_year() {
        let err = parse_row(3, "A,AA,1,20x0,5,5,5,1%,2").unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidYear {
                line: 3,
                value: "20x0".to_string()
            }
        );
    }

    #[test]
    fn parse_row_degrades_numeric_fields() {
        let row = parse_row(2, " Foo , F,1, 2001 ,n/a,,9,0.1% , 12 ").expect("row");
        assert_eq!(row.country, "Foo");
        assert_eq!(row.year, 2001);
        assert_eq!(row.tons, 0);
        assert_eq!(row.population, 0);
        assert_eq!(row.percentage_of_world, "0.1%");
        assert_eq!(row.density, "12");
        assert_eq!(row.degraded, 2);
    }

    #[test]
    fn parse_truncated_clamps_and_truncates() {
        assert_eq!(parse_truncated("1000.9"), Some(1000));
        assert_eq!(parse_truncated("-5"), Some(0));
        assert_eq!(parse_truncated("1e3"), Some(1000));
        assert_eq!(parse_truncated("abc"), None);
        assert_eq!(parse_truncated("inf"), None);
        assert_eq!(parse_truncated("-Infinity"), None);
        assert_eq!(parse_truncated("NaN"), None);
    }

    #[test]
    fn non_finite_emissions_degrade_to_zero() {
        let set = parse_lines([HEADER, "Foo,F,1,2001,inf,5,9,1%,2"]);
        let record = set.get("Foo").expect("record");
        assert_eq!(record.emissions_for(2001), 0);
        assert_eq!(record.total_emissions(), 0);
        assert_eq!(set.stats().degraded_fields, 1);
    }

    #[test]
    fn trailing_empty_field_still_counts() {
        let set = parse_lines([HEADER, "Foo,F,1,2001,10,5,9,1%,"]);
        assert_eq!(set.stats().malformed_rows, 0);
        let record = set.get("Foo").expect("record");
        assert_eq!(record.density(), "");
        assert_eq!(record.emissions_for(2001), 10);

        let set = parse_lines([HEADER, "Foo,F,1,2001,10,5,9,1%"]);
        assert!(set.is_empty());
        assert_eq!(set.stats().malformed_rows, 1);
    }

    #[test]
    fn header_is_first_non_blank_line() {
        let lines = ["", "   ", HEADER, "Foo,F,1,2001,10,5,9,1%,2"];
        let set = parse_lines(lines);
        assert_eq!(set.len(), 1);
        assert_eq!(set.stats().processed_rows, 1);
        assert_eq!(set.stats().malformed_rows, 0);
        assert_eq!(set.stats().lines_read, 4);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let set = parse_lines([HEADER, "Foo,F,1,2001,10,5,9,1%,2,extra,more"]);
        let record = set.get("Foo").expect("record");
        assert_eq!(record.density(), "2");
        assert_eq!(record.emissions_for(2001), 10);
    }
}
