//! Typed Records Module
//! Row schemas for the two supported CSV layouts, parsed once at load time.

use std::collections::HashMap;
use thiserror::Error;

/// One CSV line: column name to cell text.
pub type Row = HashMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("line {line}: missing value for column '{column}'")]
    MissingField { line: usize, column: &'static str },
    #[error("line {line}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

impl RecordError {
    pub fn line(&self) -> usize {
        match self {
            RecordError::MissingField { line, .. } | RecordError::InvalidValue { line, .. } => *line,
        }
    }
}

/// A record type that can be built from a raw CSV row.
pub trait Record: Sized + Send + Sync {
    /// Columns that must be present in the CSV header.
    const COLUMNS: &'static [&'static str];

    /// Build the record from a row. `line` is the 1-based file line (header is line 1).
    fn from_row(row: &Row, line: usize) -> Result<Self, RecordError>;
}

fn field<'a>(row: &'a Row, column: &'static str, line: usize) -> Result<&'a str, RecordError> {
    row.get(column)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(RecordError::MissingField { line, column })
}

/// A title from the streaming catalog export.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub line: usize,
    /// "Movie" / "TV Show" etc. (the `type` column)
    pub kind: String,
    pub release_year: i32,
    /// Blank ratings are kept as `None`; only the ratings list skips them.
    pub maturity_rating: Option<String>,
    /// Raw list literal, e.g. `['Dramas', 'International Movies']`.
    /// Parsed lazily by the genre aggregator so one bad cell only affects the sunburst.
    pub genre: String,
}

impl Record for Title {
    const COLUMNS: &'static [&'static str] = &["type", "release_year", "maturity_rating", "genre"];

    fn from_row(row: &Row, line: usize) -> Result<Self, RecordError> {
        let kind = field(row, "type", line)?.to_string();
        let year_raw = field(row, "release_year", line)?;
        // Exports sometimes carry years as floats ("2019.0")
        let release_year = year_raw
            .parse::<i32>()
            .ok()
            .or_else(|| {
                year_raw
                    .parse::<f64>()
                    .ok()
                    .filter(|y| y.fract() == 0.0 && y.is_finite())
                    .map(|y| y as i32)
            })
            .ok_or_else(|| RecordError::InvalidValue {
                line,
                column: "release_year",
                value: year_raw.to_string(),
            })?;
        let maturity_rating = field(row, "maturity_rating", line).ok().map(str::to_string);
        let genre = row.get("genre").cloned().unwrap_or_default();

        Ok(Title {
            line,
            kind,
            release_year,
            maturity_rating,
            genre,
        })
    }
}

/// A pickleball paddle listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub line: usize,
    pub name: String,
    pub brand: String,
    pub price: f64,
    /// The `Price` cell as written, for listing.
    pub price_text: String,
}

impl Record for Paddle {
    const COLUMNS: &'static [&'static str] = &["Paddle Name", "Brand", "Price"];

    fn from_row(row: &Row, line: usize) -> Result<Self, RecordError> {
        let name = field(row, "Paddle Name", line)?.to_string();
        let brand = field(row, "Brand", line)?.to_string();
        let price_raw = field(row, "Price", line)?;
        let price = parse_price(price_raw).ok_or_else(|| RecordError::InvalidValue {
            line,
            column: "Price",
            value: price_raw.to_string(),
        })?;

        Ok(Paddle {
            line,
            name,
            brand,
            price,
            price_text: price_raw.to_string(),
        })
    }
}

/// Parse a price cell such as `129.99`, `$129.99` or `$1,299.00`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}
