//! Static lookup tables shared by the extractors.
//!
//! All tables are built once (from defaults or a config file) and then only
//! borrowed; nothing here is mutated while menus are extracted.

use crate::domain::model::Price;
use crate::utils::error::{MenuError, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const STUDENTENWERK_BASE_URL: &str = "http://www.studentenwerk-muenchen.de/mensa/speiseplan";

/// Maps dish type labels such as "Tagesgericht 1" to their price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    entries: HashMap<String, Price>,
}

impl PriceTable {
    pub fn new(entries: HashMap<String, Price>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, label: &str) -> Result<Price> {
        self.entries
            .get(label)
            .copied()
            .ok_or_else(|| MenuError::MissingPriceEntry {
                label: label.to_string(),
            })
    }

    /// Like [`PriceTable::lookup`], but unlisted labels resolve to [`Price::Unknown`].
    pub fn price_for(&self, label: &str) -> Price {
        self.lookup(label).unwrap_or_else(|e| {
            tracing::debug!("{}", e);
            Price::Unknown
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Price)> {
        self.entries.iter().map(|(label, price)| (label.as_str(), price))
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        let special_prices = [1.55, 1.9, 2.4, 2.6, 2.8, 3.0, 3.2, 3.5, 4.0, 4.5];
        let mut entries = HashMap::new();

        for (i, price) in [1.0, 1.55, 1.9, 2.4].into_iter().enumerate() {
            entries.insert(format!("Tagesgericht {}", i + 1), Price::Fixed(price));
        }
        for (i, price) in special_prices.into_iter().enumerate() {
            entries.insert(format!("Aktionsessen {}", i + 1), Price::Fixed(price));
            entries.insert(format!("Biogericht {}", i + 1), Price::Fixed(price));
        }
        entries.insert(
            crate::domain::model::SELF_SERVICE_LABEL.to_string(),
            Price::SelfService,
        );

        Self { entries }
    }
}

/// Document layout a location publishes its menus in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Tagged HTML schedule (Studentenwerk pages).
    TagTree,
    /// Plain-text weekly table with one column per weekday.
    ColumnText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub url: Option<String>,
    pub format: SourceFormat,
}

/// Known locations and where their menus are published.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRegistry {
    locations: BTreeMap<String, Location>,
}

impl LocationRegistry {
    pub fn new(locations: BTreeMap<String, Location>) -> Self {
        Self { locations }
    }

    /// Unknown identifiers yield `None`.
    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.locations.iter().map(|(id, location)| (id.as_str(), location))
    }

    pub(crate) fn merge(&mut self, other: BTreeMap<String, Location>) {
        self.locations.extend(other);
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        let mut locations = BTreeMap::new();
        for (id, page) in [
            ("mensa-garching", 422),
            ("mensa-arcisstrasse", 421),
            ("stubistro-grosshadern", 414),
        ] {
            locations.insert(
                id.to_string(),
                Location {
                    url: Some(format!("{STUDENTENWERK_BASE_URL}/speiseplan_{page}_-de.html")),
                    format: SourceFormat::TagTree,
                },
            );
        }
        // Only published as a PDF; the text export has to be supplied.
        locations.insert(
            "fmi-bistro".to_string(),
            Location {
                url: None,
                format: SourceFormat::ColumnText,
            },
        );
        Self { locations }
    }
}

/// Noise tokens and column headers of the plain-text weekly table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTextVocabulary {
    pub allergens: Vec<String>,
    pub allergen_label: String,
    pub closed_marker: String,
    pub weekdays: [(&'static str, Weekday); 5],
}

impl Default for ColumnTextVocabulary {
    fn default() -> Self {
        // "Milcheiweiß" must be removed before "Milch", and "Ei" goes last.
        let allergens = [
            "Gluten",
            "Laktose",
            "Milcheiweiß",
            "Hühnerei",
            "Soja",
            "Nüsse",
            "Erdnuss",
            "Sellerie",
            "Fisch",
            "Krebstiere",
            "Weichtiere",
            "Sesam",
            "Senf",
            "Milch",
            "Ei",
        ];
        Self {
            allergens: allergens.iter().map(|a| a.to_string()).collect(),
            allergen_label: "Allergene:".to_string(),
            closed_marker: "geschlossen".to_string(),
            weekdays: [
                ("Montag", Weekday::Mon),
                ("Dienstag", Weekday::Tue),
                ("Mittwoch", Weekday::Wed),
                ("Donnerstag", Weekday::Thu),
                ("Freitag", Weekday::Fri),
            ],
        }
    }
}

impl ColumnTextVocabulary {
    /// The header line with all whitespace removed and lower-cased.
    pub fn normalized_header(&self) -> String {
        self.weekdays
            .iter()
            .map(|(name, _)| name.to_lowercase())
            .collect()
    }
}

/// Every table an extraction run needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuTables {
    pub prices: PriceTable,
    pub locations: LocationRegistry,
    pub vocabulary: ColumnTextVocabulary,
}
