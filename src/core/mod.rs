pub mod column_text;
pub mod dates;
pub mod dedup;
pub mod etl;
pub mod tag_tree;

pub use crate::domain::model::{Dish, Menu, MenuCollection, Price};
pub use crate::domain::ports::{ConfigProvider, DocumentSource, MenuExtractor, Storage};
pub use crate::utils::error::Result;
