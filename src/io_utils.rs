//! Source reading and output writer construction.
//!
//! The dataset is read whole into memory and decoded with `encoding_rs`
//! (UTF-8 unless another label is given). CSV output goes to stdout or a
//! file through the `csv` writer.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::warn;

pub const DEFAULT_SOURCE: &str = "co2_emission_by_countries.csv";

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Decodes `bytes`, replacing malformed sequences with U+FFFD. The flag is
/// set when any replacement happened.
pub fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> (String, bool) {
    let (text, _, had_errors) = encoding.decode(bytes);
    (text.into_owned(), had_errors)
}

/// Reads and decodes the whole source at `path`. Only open and read
/// failures are errors; undecodable bytes are replaced.
pub fn read_source(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Opening source file {path:?}"))?;
    let (text, had_errors) = decode_lossy(&bytes, encoding);
    if had_errors {
        warn!(
            "Source {path:?} contains bytes that are not valid {}; replacement characters inserted",
            encoding.name()
        );
    }
    Ok(text)
}

pub fn open_csv_writer(path: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    let mut builder = csv::WriterBuilder::new();
    builder.quote_style(QuoteStyle::Necessary).double_quote(true);
    Ok(builder.from_writer(base))
}
