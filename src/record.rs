//! Per-country emission records.
//!
//! A [`CountryRecord`] holds the static attributes captured from the first
//! row seen for a country plus a year-to-tons map that accumulates across
//! rows. Aggregates are derived on demand from the map so they always agree
//! with the latest mutation.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    name: String,
    population: u64,
    percentage_of_world_landmass: String,
    density: String,
    emissions_by_year: BTreeMap<i32, u64>,
}

impl CountryRecord {
    pub fn new(
        name: impl Into<String>,
        population: u64,
        percentage_of_world_landmass: impl Into<String>,
        density: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            population,
            percentage_of_world_landmass: percentage_of_world_landmass.into(),
            density: density.into(),
            emissions_by_year: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn percentage_of_world_landmass(&self) -> &str {
        &self.percentage_of_world_landmass
    }

    pub fn density(&self) -> &str {
        &self.density
    }

    /// Stores `tons` for `year`, replacing any earlier value for that year.
    ///
    /// Zero is never stored: a year without emissions and a year with zero
    /// emissions are indistinguishable through [`Self::emissions_for`].
    pub fn add_emission(&mut self, year: i32, tons: u64) {
        if tons == 0 {
            return;
        }
        self.emissions_by_year.insert(year, tons);
    }

    pub fn emissions_for(&self, year: i32) -> u64 {
        self.emissions_by_year.get(&year).copied().unwrap_or(0)
    }

    pub fn emissions(&self) -> &BTreeMap<i32, u64> {
        &self.emissions_by_year
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.emissions_by_year.keys().copied()
    }

    /// First and last year with stored emissions.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let first = self.emissions_by_year.keys().next()?;
        let last = self.emissions_by_year.keys().next_back()?;
        Some((*first, *last))
    }

    pub fn total_emissions(&self) -> u64 {
        self.emissions_by_year
            .values()
            .fold(0u64, |acc, tons| acc.saturating_add(*tons))
    }

    pub fn average_per_capita(&self) -> f64 {
        if self.population == 0 {
            return 0.0;
        }
        self.total_emissions() as f64 / self.population as f64
    }

    /// Year with the largest stored value; the earliest such year on ties,
    /// 0 when nothing is stored.
    pub fn peak_year(&self) -> i32 {
        let mut peak_year = 0;
        let mut peak_tons = 0;
        // BTreeMap iterates in ascending year order, so strict `>` keeps the
        // lowest year among equal maxima.
        for (year, tons) in &self.emissions_by_year {
            if *tons > peak_tons {
                peak_tons = *tons;
                peak_year = *year;
            }
        }
        peak_year
    }
}
