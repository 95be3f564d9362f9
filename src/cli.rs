use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::io_utils::DEFAULT_SOURCE;

pub const MIN_YEAR: i32 = 1750;
pub const MAX_YEAR: i32 = 2022;

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore per-country CO2 emissions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rank the countries with the highest emissions in a year
    Top(TopArgs),
    /// Show the single highest emitter for a year
    Highest(HighestArgs),
    /// Show details for the first country whose name contains the query
    Country(CountryArgs),
    /// Summarize what was loaded from the source
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Emissions CSV file
    #[arg(short = 'i', long = "input", default_value = DEFAULT_SOURCE)]
    pub input: PathBuf,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct TopArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Year to rank
    #[arg(short, long, default_value_t = MAX_YEAR)]
    pub year: i32,
    /// Maximum number of countries to list
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
    /// Earliest year to fall back to when the requested year has no data
    #[arg(long = "fallback-floor", default_value_t = 2010)]
    pub fallback_floor: i32,
    /// Only rank the requested year
    #[arg(long = "no-fallback")]
    pub no_fallback: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct HighestArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Year to inspect (1750-2022)
    #[arg(short, long)]
    pub year: i32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct CountryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Case-insensitive part of the country name
    #[arg(short, long)]
    pub name: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Output rendering for command results
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}
