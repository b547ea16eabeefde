//! Extraction of the FMI Bistro weekly table.
//!
//! The table is a plain-text export with one column per weekday. Columns are
//! recovered from the character offsets of the weekday names in the header
//! line, so the layout must stay aligned across lines.

use crate::core::dates::resolve_from_week;
use crate::core::dedup::dedupe;
use crate::domain::model::{Dish, Menu, MenuCollection, Price};
use crate::domain::ports::MenuExtractor;
use crate::domain::tables::ColumnTextVocabulary;
use crate::utils::error::{MenuError, Result};
use chrono::Weekday;
use regex::Regex;
use std::sync::LazyLock;

static DISH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".+?€\s\d+,\d+").unwrap());
static PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"€\s\d+,\d+").unwrap());

/// One week of the plain-text table together with its calendar week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyText {
    pub text: String,
    pub year: i32,
    /// `%W` week number (weeks start on Monday, week 0 before the first Monday).
    pub week: u32,
}

pub struct ColumnTextExtractor<'a> {
    vocabulary: &'a ColumnTextVocabulary,
}

/// Characters `start..end` of `line`, counted in chars; `end = None` runs to the end.
fn slice_chars(line: &str, start: usize, end: Option<usize>) -> String {
    let len = end.map_or(usize::MAX, |end| end.saturating_sub(start));
    line.chars().skip(start).take(len).collect()
}

/// "€ 3,50" -> 3.5
fn parse_price(token: &str) -> Result<f64> {
    token
        .replace('€', "")
        .replace(',', ".")
        .trim()
        .parse()
        .map_err(|_| MenuError::StructuralMismatch {
            reason: format!("unreadable price '{}'", token),
        })
}

impl<'a> ColumnTextExtractor<'a> {
    pub fn new(vocabulary: &'a ColumnTextVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn extract_week(&self, text: &str, year: i32, week: u32) -> MenuCollection {
        let mut menus = MenuCollection::new();

        let Some(lines) = self.table_lines(text) else {
            tracing::warn!("No weekday header line found, nothing to extract");
            return menus;
        };

        for (weekday, column) in self.day_columns(&lines) {
            if column
                .to_lowercase()
                .contains(&self.vocabulary.closed_marker.to_lowercase())
            {
                tracing::debug!("Closed on {}", weekday);
                continue;
            }

            let dishes = match self.parse_dishes(&column) {
                Ok(dishes) => dishes,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", weekday, e);
                    continue;
                }
            };

            match resolve_from_week(year, week, weekday) {
                Ok(date) => {
                    tracing::debug!("Parsed {} dishes for {}", dishes.len(), date);
                    menus.insert(Menu::new(date, dishes));
                }
                Err(e) => tracing::warn!("Skipping {}: {}", weekday, e),
            }
        }

        menus
    }

    /// Lines starting at the weekday header; `None` if there is no header.
    fn table_lines<'t>(&self, text: &'t str) -> Option<Vec<&'t str>> {
        let header = self.vocabulary.normalized_header();
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.iter().position(|line| {
            let normalized: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            normalized.to_lowercase() == header
        })?;
        Some(lines[start..].to_vec())
    }

    /// Text of each weekday column across all lines, joined with spaces.
    ///
    /// Weekdays whose name is missing from the header line get no column.
    fn day_columns(&self, lines: &[&str]) -> Vec<(Weekday, String)> {
        let Some(header) = lines.first() else {
            return Vec::new();
        };

        let offsets: Vec<Option<usize>> = self
            .vocabulary
            .weekdays
            .iter()
            .map(|(name, _)| header.find(name).map(|pos| header[..pos].chars().count()))
            .collect();

        let mut columns = Vec::new();
        for (i, (name, weekday)) in self.vocabulary.weekdays.iter().enumerate() {
            let Some(start) = offsets[i] else {
                tracing::warn!("Weekday '{}' not found in header line", name);
                continue;
            };
            let end = offsets[i + 1..].iter().flatten().next().copied();

            let column = lines
                .iter()
                .map(|line| slice_chars(line, start, end))
                .collect::<Vec<_>>()
                .join(" ")
                .replace(name, "");
            columns.push((*weekday, column));
        }
        columns
    }

    /// Dish records of one day's column.
    ///
    /// Fails with [`MenuError::StructuralMismatch`] when the number of names
    /// and prices found differ.
    fn parse_dishes(&self, column: &str) -> Result<Vec<Dish>> {
        let text = column.replace(&self.vocabulary.allergen_label, "");
        let mut text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        for allergen in &self.vocabulary.allergens {
            text = text.replace(allergen.as_str(), "");
        }

        let records: Vec<&str> = DISH.find_iter(&text).map(|m| m.as_str()).collect();

        let prices = PRICE
            .find_iter(&records.join(" "))
            .map(|m| parse_price(m.as_str()))
            .collect::<Result<Vec<f64>>>()?;

        let names: Vec<String> = records
            .iter()
            .map(|record| PRICE.replace_all(record, "").replace(',', "").trim().to_string())
            .collect();

        if names.len() != prices.len() {
            return Err(MenuError::StructuralMismatch {
                reason: format!("{} dish names but {} prices", names.len(), prices.len()),
            });
        }

        // a day can list the same dish at several prices
        Ok(dedupe(&names)
            .into_iter()
            .zip(prices)
            .map(|(name, price)| Dish::new(name, Price::Fixed(price)))
            .collect())
    }
}

impl MenuExtractor for ColumnTextExtractor<'_> {
    type Input = WeeklyText;

    fn extract(&self, input: &WeeklyText) -> MenuCollection {
        self.extract_week(&input.text, input.year, input.week)
    }
}
