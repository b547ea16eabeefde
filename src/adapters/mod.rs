// Concrete implementations of the domain ports: HTTP retrieval, local storage
// and the output encoders.

pub mod http;
pub mod output;
pub mod storage;

pub use http::HttpSource;
pub use storage::LocalStorage;
