use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::btree_map::{self, BTreeMap};

/// Label the price table and the serialized output use for self-service dishes.
pub const SELF_SERVICE_LABEL: &str = "Self-Service";

/// Value written for dishes whose price is unknown.
pub const UNKNOWN_PRICE_SENTINEL: f64 = -1.0;

/// File formats menus can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Price of a single dish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    /// A fixed price in euros.
    Fixed(f64),
    /// Weighed or self-served food without a fixed price.
    SelfService,
    /// The dish type has no entry in the price table.
    Unknown,
}

impl Price {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Fixed(amount) => Some(*amount),
            _ => None,
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Fixed(amount) => write!(f, "{:.2}", amount),
            Price::SelfService => f.write_str(SELF_SERVICE_LABEL),
            Price::Unknown => write!(f, "{}", UNKNOWN_PRICE_SENTINEL),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Price::Fixed(amount) => serializer.serialize_f64(*amount),
            Price::SelfService => serializer.serialize_str(SELF_SERVICE_LABEL),
            Price::Unknown => serializer.serialize_f64(UNKNOWN_PRICE_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dish {
    pub name: String,
    pub price: Price,
}

impl Dish {
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// All dishes offered on one day at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    pub date: NaiveDate,
    pub dishes: Vec<Dish>,
}

impl Menu {
    pub fn new(date: NaiveDate, dishes: Vec<Dish>) -> Self {
        Self { date, dishes }
    }
}

/// Menus keyed by their date, iterated in calendar order.
///
/// Menus can only be added through [`MenuCollection::insert`], which keys
/// them by their own date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuCollection {
    menus: BTreeMap<NaiveDate, Menu>,
}

impl MenuCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a menu, replacing any previous menu for the same date.
    pub fn insert(&mut self, menu: Menu) -> Option<Menu> {
        self.menus.insert(menu.date, menu)
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&Menu> {
        self.menus.get(date)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.menus.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.menus.keys()
    }

    pub fn iter(&self) -> btree_map::Values<'_, NaiveDate, Menu> {
        self.menus.values()
    }
}

impl<'a> IntoIterator for &'a MenuCollection {
    type Item = &'a Menu;
    type IntoIter = btree_map::Values<'a, NaiveDate, Menu>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Menu> for MenuCollection {
    fn from_iter<I: IntoIterator<Item = Menu>>(iter: I) -> Self {
        let mut collection = MenuCollection::new();
        for menu in iter {
            collection.insert(menu);
        }
        collection
    }
}

// date -> dishes, e.g. {"2024-01-15": [{"name": ..., "price": 1.0}]}
impl Serialize for MenuCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.menus.iter().map(|(date, menu)| (date, &menu.dishes)))
    }
}
