//! Data Processor Module
//! Aggregations feeding the slide views: category counts, genre tallies and price summaries.

use crate::data::records::Title;
use log::warn;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::collections::HashMap;
use thiserror::Error;

/// Number of rows sharing one category value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Named numeric value (genre tally, price, mean price).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenreParseError {
    #[error("genre cell is empty")]
    Empty,
    #[error("genre cell is not a list: {0}")]
    NotAList(String),
    #[error("unterminated string in genre cell: {0}")]
    Unterminated(String),
}

/// A title whose genre cell could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: GenreParseError,
}

/// Result of the genre aggregation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenreTally {
    pub entries: Vec<NamedValue>,
    pub skipped: Vec<SkippedRow>,
}

impl GenreTally {
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }
}

/// Summary of a price column.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub mean: f64,
    pub median: f64,
    pub min_index: usize,
    pub max_index: usize,
}

/// Accumulates values keyed by name while keeping first-encounter order.
struct OrderedTally<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V: Default> OrderedTally<V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn slot(&mut self, key: &str) -> &mut V {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.entries.push((key.to_string(), V::default()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}

/// Handles aggregation over typed records.
pub struct DataProcessor;

impl DataProcessor {
    /// Count rows per distinct selector value, in order of first encounter.
    pub fn group_by_category<'a, T, F, K>(rows: &'a [T], selector: F) -> Vec<CategoryCount>
    where
        F: Fn(&'a T) -> K,
        K: AsRef<str>,
    {
        let mut tally = OrderedTally::<usize>::new();
        for row in rows {
            *tally.slot(selector(row).as_ref()) += 1;
        }
        tally
            .into_entries()
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect()
    }

    /// Distinct selector values in order of first encounter.
    pub fn distinct_values<'a, T, F, K>(rows: &'a [T], selector: F) -> Vec<String>
    where
        F: Fn(&'a T) -> K,
        K: AsRef<str>,
    {
        Self::group_by_category(rows, selector)
            .into_iter()
            .map(|c| c.category)
            .collect()
    }

    /// Smallest and largest release year.
    pub fn year_extent(titles: &[Title]) -> Option<(i32, i32)> {
        let min = titles.iter().map(|t| t.release_year).min()?;
        let max = titles.iter().map(|t| t.release_year).max()?;
        Some((min, max))
    }

    /// Count genre occurrences across all titles.
    ///
    /// Cells are parsed in parallel; counting is sequential so entry order is
    /// the first-encounter order over the dataset. Rows whose cell cannot be
    /// parsed are skipped and listed in [`GenreTally::skipped`].
    pub fn process_genre_data(titles: &[Title]) -> GenreTally {
        let parsed: Vec<Result<Vec<String>, GenreParseError>> = titles
            .par_iter()
            .map(|t| parse_genre_list(&t.genre))
            .collect();

        let mut tally = OrderedTally::<f64>::new();
        let mut skipped = Vec::new();

        for (title, result) in titles.iter().zip(parsed) {
            match result {
                Ok(genres) => {
                    for genre in genres {
                        *tally.slot(&genre) += 1.0;
                    }
                }
                Err(reason) => skipped.push(SkippedRow {
                    line: title.line,
                    reason,
                }),
            }
        }

        if !skipped.is_empty() {
            warn!(
                "skipped {} titles with unreadable genres (first at line {}: {})",
                skipped.len(),
                skipped[0].line,
                skipped[0].reason
            );
        }

        GenreTally {
            entries: tally
                .into_entries()
                .into_iter()
                .map(|(name, value)| NamedValue { name, value })
                .collect(),
            skipped,
        }
    }

    /// Mean of `value` per distinct `key`, in order of first encounter.
    pub fn mean_by_category<'a, T, K, V, S>(rows: &'a [T], key: K, value: V) -> Vec<NamedValue>
    where
        K: Fn(&'a T) -> S,
        S: AsRef<str>,
        V: Fn(&T) -> f64,
    {
        let mut tally = OrderedTally::<Vec<f64>>::new();
        for row in rows {
            tally.slot(key(row).as_ref()).push(value(row));
        }
        tally
            .into_entries()
            .into_iter()
            .map(|(name, values)| NamedValue {
                name,
                value: Statistics::mean(values.iter()),
            })
            .collect()
    }

    /// Mean, median and positions of the cheapest and dearest entry.
    pub fn price_summary(prices: &[f64]) -> Option<PriceSummary> {
        if prices.is_empty() {
            return None;
        }

        let mut min_index = 0;
        let mut max_index = 0;
        for (i, &p) in prices.iter().enumerate() {
            if p < prices[min_index] {
                min_index = i;
            }
            if p > prices[max_index] {
                max_index = i;
            }
        }

        Some(PriceSummary {
            mean: Statistics::mean(prices.iter()),
            median: Data::new(prices.to_vec()).median(),
            min_index,
            max_index,
        })
    }
}

/// Parse a list literal such as `['Drama', 'Comedy']` into its strings.
///
/// Single quotes are swapped for double quotes and the result read as a JSON
/// string array. Cells that break that substitution (a genre holding an
/// apostrophe, exported as `["Kids' TV", 'Dramas']`) are read by
/// [`scan_list_literal`] instead.
pub fn parse_genre_list(cell: &str) -> Result<Vec<String>, GenreParseError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Err(GenreParseError::Empty);
    }

    match serde_json::from_str::<Vec<String>>(&trimmed.replace('\'', "\"")) {
        Ok(genres) => Ok(genres),
        Err(_) => scan_list_literal(trimmed),
    }
}

/// Read a bracketed list of single- or double-quoted strings.
fn scan_list_literal(text: &str) -> Result<Vec<String>, GenreParseError> {
    let not_a_list = || GenreParseError::NotAList(text.to_string());

    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(not_a_list)?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let quote = match chars.next() {
            None if items.is_empty() => return Ok(items),
            None => return Err(not_a_list()),
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return Err(not_a_list()),
        };

        let mut item = String::new();
        loop {
            match chars.next() {
                None => return Err(GenreParseError::Unterminated(text.to_string())),
                Some('\\') => match chars.next() {
                    Some(escaped) => item.push(escaped),
                    None => return Err(GenreParseError::Unterminated(text.to_string())),
                },
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
            }
        }
        items.push(item);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => return Ok(items),
            Some(',') => continue,
            Some(_) => return Err(not_a_list()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(line: usize, kind: &str, year: i32, rating: &str, genre: &str) -> Title {
        Title {
            line,
            kind: kind.into(),
            release_year: year,
            maturity_rating: Some(rating.into()),
            genre: genre.into(),
        }
    }

    #[test]
    fn group_by_type_counts_in_first_seen_order() {
        let rows = vec![
            title(2, "Movie", 2000, "PG", "[]"),
            title(3, "Movie", 2001, "PG", "[]"),
            title(4, "Show", 2002, "PG", "[]"),
        ];
        let counts = DataProcessor::group_by_category(&rows, |t| t.kind.as_str());
        assert_eq!(
            counts,
            vec![
                CategoryCount {
                    category: "Movie".into(),
                    count: 2
                },
                CategoryCount {
                    category: "Show".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn category_counts_partition_the_rows() {
        let kinds = ["a", "b", "a", "c", "b", "a", "d", "c"];
        for len in 0..=kinds.len() {
            let rows = &kinds[..len];
            let counts = DataProcessor::group_by_category(rows, |k| *k);
            assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), len);
            let mut seen: Vec<&str> = counts.iter().map(|c| c.category.as_str()).collect();
            seen.dedup();
            assert_eq!(seen.len(), counts.len());
        }
    }

    #[test]
    fn genre_scenario_counts_each_tag() {
        let rows = vec![
            title(2, "Movie", 2000, "PG", "['Drama']"),
            title(3, "Movie", 2001, "PG", "['Drama','Comedy']"),
        ];
        let tally = DataProcessor::process_genre_data(&rows);
        assert!(tally.skipped.is_empty());
        assert_eq!(
            tally.entries,
            vec![
                NamedValue {
                    name: "Drama".into(),
                    value: 2.0
                },
                NamedValue {
                    name: "Comedy".into(),
                    value: 1.0
                },
            ]
        );
        assert_eq!(tally.total(), 3.0);
    }

    #[test]
    fn genre_total_matches_tag_occurrences() {
        let cells = [
            "['Dramas', 'International Movies']",
            "['Comedies']",
            "[]",
            "['Dramas', 'Comedies', 'Romantic Movies']",
        ];
        let rows: Vec<Title> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| title(i + 2, "Movie", 2000, "PG", c))
            .collect();
        let expected: usize = cells
            .iter()
            .map(|c| parse_genre_list(c).unwrap().len())
            .sum();
        assert_eq!(
            DataProcessor::process_genre_data(&rows).total(),
            expected as f64
        );
    }

    #[test]
    fn malformed_genre_row_is_skipped_and_reported() {
        let rows = vec![
            title(2, "Movie", 2000, "PG", "['Drama']"),
            title(3, "Movie", 2000, "PG", "Drama, Comedy"),
            title(4, "Movie", 2000, "PG", ""),
            title(5, "Movie", 2000, "PG", "['Comedy']"),
        ];
        let tally = DataProcessor::process_genre_data(&rows);
        assert_eq!(tally.total(), 2.0);
        assert_eq!(
            tally.skipped.iter().map(|s| s.line).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(tally.skipped[1].reason, GenreParseError::Empty);
    }

    #[test]
    fn apostrophes_survive_via_literal_scanner() {
        assert_eq!(
            parse_genre_list(r#"["Kids' TV", 'TV Comedies']"#).unwrap(),
            vec!["Kids' TV".to_string(), "TV Comedies".to_string()]
        );
        assert!(matches!(
            parse_genre_list("['Kids' TV']"),
            Err(GenreParseError::NotAList(_))
        ));
        assert!(matches!(
            parse_genre_list("['Drama"),
            Err(GenreParseError::NotAList(_))
        ));
        assert!(matches!(
            parse_genre_list(r#"["Kids' TV]"#),
            Err(GenreParseError::Unterminated(_))
        ));
    }

    #[test]
    fn empty_list_is_valid() {
        assert_eq!(parse_genre_list("[]").unwrap(), Vec::<String>::new());
        assert_eq!(parse_genre_list("[ ]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn year_extent_and_distinct_ratings() {
        let rows = vec![
            title(2, "Movie", 2010, "PG", "[]"),
            title(3, "Movie", 1999, "R", "[]"),
            title(4, "Show", 2021, "PG", "[]"),
        ];
        assert_eq!(DataProcessor::year_extent(&rows), Some((1999, 2021)));
        assert_eq!(DataProcessor::year_extent(&[]), None);
        assert_eq!(
            DataProcessor::distinct_values(&rows, |t| t.maturity_rating.as_deref().unwrap_or("")),
            vec!["PG", "R"]
        );
    }

    #[test]
    fn mean_price_per_brand() {
        let rows = vec![("Joola", 200.0), ("Selkirk", 150.0), ("Joola", 100.0)];
        let means = DataProcessor::mean_by_category(&rows, |r| r.0, |r| r.1);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].name, "Joola");
        assert!((means[0].value - 150.0).abs() < 1e-9);
        assert!((means[1].value - 150.0).abs() < 1e-9);
    }

    #[test]
    fn price_summary_finds_extremes() {
        let summary = DataProcessor::price_summary(&[120.0, 80.0, 250.0, 100.0]).unwrap();
        assert_eq!(summary.min_index, 1);
        assert_eq!(summary.max_index, 2);
        assert!((summary.mean - 137.5).abs() < 1e-9);
        assert!((summary.median - 110.0).abs() < 1e-9);
        assert!(DataProcessor::price_summary(&[]).is_none());
    }
}
