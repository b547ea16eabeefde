//! Extraction of the Studentenwerk HTML schedule.
//!
//! Each day is a `div.c-schedule__item` block whose `strong` element carries
//! the date. Dish descriptions and dish type labels are listed in two
//! parallel sequences inside the block.

use crate::core::dates::resolve_free_text;
use crate::core::dedup::dedupe;
use crate::domain::model::{Dish, Menu, MenuCollection};
use crate::domain::ports::MenuExtractor;
use crate::domain::tables::PriceTable;
use crate::utils::error::{MenuError, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

// Exact attribute matches: the class attribute must equal the value.
static SCHEDULE_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"div[class="c-schedule__item"]"#).unwrap());
static BLOCK_DATE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong").unwrap());
static DISH_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"p[class="js-schedule-dish-description"]"#).unwrap());
static DISH_TYPE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[class="stwm-artname"]"#).unwrap());

/// Text nodes that are direct children of `element`, skipping blank ones.
fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .filter(|text| !text.trim().is_empty())
}

pub struct TagTreeExtractor<'a> {
    prices: &'a PriceTable,
    reference_year: i32,
}

impl<'a> TagTreeExtractor<'a> {
    /// `reference_year` is used for every date since the page omits years.
    pub fn new(prices: &'a PriceTable, reference_year: i32) -> Self {
        Self {
            prices,
            reference_year,
        }
    }

    /// Parses `html` and extracts its menus.
    pub fn extract_html(&self, html: &str) -> MenuCollection {
        self.extract(&Html::parse_document(html))
    }

    fn parse_block(&self, block: ElementRef<'_>) -> Result<Menu> {
        let date_text = block
            .select(&BLOCK_DATE)
            .flat_map(own_text)
            .next()
            .ok_or_else(|| MenuError::DateParse {
                input: String::new(),
            })?;
        let date = resolve_free_text(date_text, self.reference_year)?;

        Ok(Menu::new(date, self.parse_dishes(block)))
    }

    fn parse_dishes(&self, block: ElementRef<'_>) -> Vec<Dish> {
        let names: Vec<&str> = block
            .select(&DISH_DESCRIPTION)
            .flat_map(own_text)
            .map(str::trim_end)
            .collect();
        // the same description may be offered in several variants
        let names = dedupe(&names);

        let types: Vec<&str> = block
            .select(&DISH_TYPE)
            .flat_map(own_text)
            .map(str::trim)
            .collect();

        if names.len() != types.len() {
            tracing::warn!(
                "{}",
                MenuError::StructuralMismatch {
                    reason: format!(
                        "{} dish descriptions but {} dish types; unpaired entries dropped",
                        names.len(),
                        types.len()
                    ),
                }
            );
        }

        // Insertion-ordered name -> type. A name that is still repeated keeps
        // its first position but takes the last type it was paired with.
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        for (name, dish_type) in names.iter().zip(types) {
            match index.get(name.as_str()).copied() {
                Some(i) => pairs[i].1 = dish_type,
                None => {
                    index.insert(name.as_str(), pairs.len());
                    pairs.push((name.as_str(), dish_type));
                }
            }
        }

        pairs
            .into_iter()
            .map(|(name, dish_type)| Dish::new(name, self.prices.price_for(dish_type)))
            .collect()
    }
}

impl MenuExtractor for TagTreeExtractor<'_> {
    type Input = Html;

    fn extract(&self, document: &Html) -> MenuCollection {
        let mut menus = MenuCollection::new();

        for block in document.select(&SCHEDULE_BLOCK) {
            match self.parse_block(block) {
                Ok(menu) => {
                    tracing::debug!("Parsed {} dishes for {}", menu.dishes.len(), menu.date);
                    menus.insert(menu);
                }
                Err(e) => {
                    // keep going with the remaining days
                    tracing::warn!("Skipping schedule block: {}", e);
                }
            }
        }

        menus
    }
}
