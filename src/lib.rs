pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpSource, LocalStorage};
pub use config::{toml_config::MenuConfig, RunSettings};
pub use core::{
    column_text::{ColumnTextExtractor, WeeklyText},
    dates::{resolve_free_text, resolve_from_week, week_of_year, weekday_from_code},
    dedup::dedupe,
    etl::MenuEngine,
    tag_tree::TagTreeExtractor,
};
pub use domain::model::{Dish, Menu, MenuCollection, OutputFormat, Price};
pub use domain::tables::{ColumnTextVocabulary, LocationRegistry, MenuTables, PriceTable};
pub use utils::error::{MenuError, Result};
