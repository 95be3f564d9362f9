//! Presentation of query results: number formatting, report rows, and
//! emission in table, CSV, or JSON form.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    cli::OutputFormat,
    io_utils,
    record::CountryRecord,
    table::{self, Align},
};

/// Label for the total-emissions figure; the dataset covers these years.
pub const TOTAL_EMISSIONS_LABEL: &str = "Total CO2 Emissions (1750-2022)";

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_per_capita(value: f64) -> String {
    format!("{value:.2}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub country: String,
    pub year: i32,
    pub emissions: u64,
}

pub fn ranking_entries(year: i32, ranked: &[&CountryRecord]) -> Vec<RankingEntry> {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, record)| RankingEntry {
            rank: idx + 1,
            country: record.name().to_string(),
            year,
            emissions: record.emissions_for(year),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDetails {
    pub name: String,
    pub population: u64,
    pub percentage_of_world_landmass: String,
    pub density: String,
    pub total_emissions: u64,
    pub average_per_capita: f64,
    pub peak_year: i32,
}

impl From<&CountryRecord> for CountryDetails {
    fn from(record: &CountryRecord) -> Self {
        Self {
            name: record.name().to_string(),
            population: record.population(),
            percentage_of_world_landmass: record.percentage_of_world_landmass().to_string(),
            density: record.density().to_string(),
            total_emissions: record.total_emissions(),
            average_per_capita: record.average_per_capita(),
            peak_year: record.peak_year(),
        }
    }
}

impl CountryDetails {
    /// Label/value pairs in display order.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        vec![
            vec!["Country".to_string(), self.name.clone()],
            vec![
                "Population".to_string(),
                format_thousands(self.population),
            ],
            vec!["Density".to_string(), self.density.clone()],
            vec![
                "% of World Landmass".to_string(),
                self.percentage_of_world_landmass.clone(),
            ],
            vec![
                TOTAL_EMISSIONS_LABEL.to_string(),
                format!("{} tons", format_thousands(self.total_emissions)),
            ],
            vec![
                "Average Emissions Per Capita".to_string(),
                format!("{} tons/person", format_per_capita(self.average_per_capita)),
            ],
            vec![
                "Year with Highest Emissions".to_string(),
                self.peak_year.to_string(),
            ],
        ]
    }
}

/// Writes a report to stdout. `rows` feed the table and CSV forms, `data`
/// the JSON form.
pub fn emit<T: Serialize + ?Sized>(
    format: OutputFormat,
    headers: &[&str],
    aligns: &[Align],
    rows: &[Vec<String>],
    data: &T,
) -> Result<()> {
    match format {
        OutputFormat::Table => table::print_table(headers, aligns, rows),
        OutputFormat::Csv => {
            let mut writer = io_utils::open_csv_writer(None)?;
            writer.write_record(headers)?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush().context("Flushing CSV output")?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).context("Serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}
