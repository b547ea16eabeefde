use crate::domain::model::{MenuCollection, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Turns one source format into menus.
///
/// Implementations are pure: the same input always yields the same
/// collection, and a day that cannot be parsed is left out rather than
/// failing the whole extraction.
pub trait MenuExtractor {
    type Input: ?Sized;

    fn extract(&self, input: &Self::Input) -> MenuCollection;
}

/// Fetches raw documents for the extractors.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Run settings the engine needs besides the lookup tables.
pub trait ConfigProvider: Send + Sync {
    fn year(&self) -> i32;
    /// `%W` week number of the week to extract.
    fn week(&self) -> u32;
    /// Local file to read instead of fetching the location URL.
    fn input_path(&self) -> Option<&str>;
    fn output_formats(&self) -> &[OutputFormat];
}
