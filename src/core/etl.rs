use crate::adapters::output;
use crate::core::column_text::ColumnTextExtractor;
use crate::core::tag_tree::TagTreeExtractor;
use crate::domain::model::MenuCollection;
use crate::domain::ports::{ConfigProvider, DocumentSource, Storage};
use crate::domain::tables::{Location, MenuTables, SourceFormat};
use crate::utils::error::Result;
use crate::utils::validation;

/// Extract, transform and load the menus of one location.
pub struct MenuEngine<D: DocumentSource, S: Storage, C: ConfigProvider> {
    source: D,
    storage: S,
    config: C,
    tables: MenuTables,
}

impl<D: DocumentSource, S: Storage, C: ConfigProvider> MenuEngine<D, S, C> {
    pub fn new(source: D, storage: S, config: C, tables: MenuTables) -> Self {
        Self {
            source,
            storage,
            config,
            tables,
        }
    }

    pub fn tables(&self) -> &MenuTables {
        &self.tables
    }

    /// Raw document of a location, or `None` for an unknown location.
    ///
    /// The configured input file takes precedence over the location URL.
    pub async fn fetch_document(&self, location_id: &str) -> Result<Option<(Location, String)>> {
        let Some(location) = self.tables.locations.get(location_id) else {
            tracing::warn!("Unknown location '{}'", location_id);
            return Ok(None);
        };

        let document = match self.config.input_path() {
            Some(path) => {
                tracing::debug!("Reading {} from {}", location_id, path);
                tokio::fs::read_to_string(path).await?
            }
            None => {
                let url = validation::validate_required_field(
                    &format!("input (location '{}' has no URL)", location_id),
                    &location.url,
                )?;
                self.source.fetch(url).await?
            }
        };

        Ok(Some((location.clone(), document)))
    }

    /// Runs the extractor matching the location's source format.
    pub fn parse(&self, location: &Location, document: &str, year: i32, week: u32) -> MenuCollection {
        match location.format {
            SourceFormat::TagTree => {
                TagTreeExtractor::new(&self.tables.prices, year).extract_html(document)
            }
            SourceFormat::ColumnText => {
                ColumnTextExtractor::new(&self.tables.vocabulary).extract_week(document, year, week)
            }
        }
    }

    /// Writes `menus` in every configured format; returns the written paths.
    pub async fn load(&self, menus: &MenuCollection) -> Result<Vec<String>> {
        let mut written = Vec::new();
        for format in self.config.output_formats() {
            let data = output::render(*format, menus)?;
            let path = output::file_name(*format);
            self.storage.write_file(&path, &data).await?;
            written.push(path);
        }
        Ok(written)
    }

    /// Fetches and parses the menus of a location without writing them.
    pub async fn collect(&self, location_id: &str) -> Result<Option<MenuCollection>> {
        let Some((location, document)) = self.fetch_document(location_id).await? else {
            return Ok(None);
        };

        let menus = self.parse(&location, &document, self.config.year(), self.config.week());
        tracing::info!("Extracted {} menus for {}", menus.len(), location_id);
        Ok(Some(menus))
    }

    pub async fn run(&self, location_id: &str) -> Result<Option<Vec<String>>> {
        tracing::info!("Starting extraction for {}", location_id);

        // Extract + Transform
        let Some(menus) = self.collect(location_id).await? else {
            return Ok(None);
        };

        // Load
        let written = self.load(&menus).await?;
        tracing::info!("Output saved to: {}", written.join(", "));

        Ok(Some(written))
    }
}
