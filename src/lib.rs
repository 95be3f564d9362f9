pub mod cli;
pub mod ingest;
pub mod io_utils;
pub mod query;
pub mod record;
pub mod report;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Result, bail};
use clap::Parser;
use log::{LevelFilter, info, warn};
use serde_json::json;

use crate::{
    cli::{Cli, Commands, MAX_YEAR, MIN_YEAR},
    ingest::RecordSet,
    report::{CountryDetails, format_thousands},
    table::Align,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("co2_emissions", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Top(args) => handle_top(&args),
        Commands::Highest(args) => handle_highest(&args),
        Commands::Country(args) => handle_country(&args),
        Commands::Summary(args) => handle_summary(&args),
    }
}

/// Loads the source, or reports that nothing was loaded and yields `None`.
fn load(source: &cli::SourceArgs) -> Result<Option<RecordSet>> {
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    info!("Loading emissions from {:?}", source.input);
    let set = ingest::load_records(&source.input, encoding);
    if set.is_empty() {
        warn!("No countries loaded from {:?}", source.input);
        println!("No data loaded from {}", source.input.display());
        return Ok(None);
    }
    Ok(Some(set))
}

fn handle_top(args: &cli::TopArgs) -> Result<()> {
    let Some(set) = load(&args.source)? else {
        return Ok(());
    };
    let (year, ranked) = if args.no_fallback {
        (
            args.year,
            query::top_polluters(set.records(), args.year, args.limit),
        )
    } else {
        query::top_polluters_with_fallback(
            set.records(),
            args.year,
            args.fallback_floor,
            args.limit,
        )
    };
    if ranked.is_empty() {
        println!(
            "Loaded {} countries, but no emission data found for {}",
            set.len(),
            args.year
        );
        return Ok(());
    }
    if year != args.year {
        info!("Year {} has no data; showing {year}", args.year);
    }

    let entries = report::ranking_entries(year, &ranked);
    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.rank.to_string(),
                entry.country.clone(),
                format_thousands(entry.emissions),
            ]
        })
        .collect::<Vec<_>>();
    if args.format == cli::OutputFormat::Table {
        println!("Top {} CO2 Polluters ({year})", args.limit);
    }
    report::emit(
        args.format,
        &["rank", "country", "emissions_tons"],
        &[Align::Right, Align::Left, Align::Right],
        &rows,
        &entries,
    )
}

fn handle_highest(args: &cli::HighestArgs) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&args.year) {
        bail!("Year must be between {MIN_YEAR} and {MAX_YEAR}");
    }
    let Some(set) = load(&args.source)? else {
        return Ok(());
    };
    let Some(record) = query::highest_emitter(set.records(), args.year) else {
        println!("No data available for {}", args.year);
        return Ok(());
    };
    let emissions = record.emissions_for(args.year);
    let rows = vec![vec![
        args.year.to_string(),
        record.name().to_string(),
        format_thousands(emissions),
    ]];
    report::emit(
        args.format,
        &["year", "country", "emissions_tons"],
        &[Align::Right, Align::Left, Align::Right],
        &rows,
        &json!({
            "year": args.year,
            "country": record.name(),
            "emissions": emissions,
        }),
    )
}

fn handle_country(args: &cli::CountryArgs) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("Please enter a country name");
    }
    let Some(set) = load(&args.source)? else {
        return Ok(());
    };
    let Some(record) = query::find_by_name(set.records(), name) else {
        println!("Country not found: {name}");
        return Ok(());
    };
    let details = CountryDetails::from(record);
    report::emit(
        args.format,
        &["field", "value"],
        &[],
        &details.display_rows(),
        &details,
    )
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let Some(set) = load(&args.source)? else {
        return Ok(());
    };
    let stats = set.stats();
    let span = set.year_span();
    let (first, last) = match span {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => ("-".to_string(), "-".to_string()),
    };
    let rows = vec![
        vec!["countries".to_string(), set.len().to_string()],
        vec!["lines_read".to_string(), stats.lines_read.to_string()],
        vec!["processed_rows".to_string(), stats.processed_rows.to_string()],
        vec!["malformed_rows".to_string(), stats.malformed_rows.to_string()],
        vec!["degraded_fields".to_string(), stats.degraded_fields.to_string()],
        vec!["first_year".to_string(), first],
        vec!["last_year".to_string(), last],
    ];
    report::emit(
        args.format,
        &["metric", "value"],
        &[Align::Left, Align::Right],
        &rows,
        &json!({
            "countries": set.len(),
            "stats": stats,
            "first_year": span.map(|(first, _)| first),
            "last_year": span.map(|(_, last)| last),
        }),
    )
}
