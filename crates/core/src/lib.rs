pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use catalog::loader::{load_path, load_reader, load_str};
pub use catalog::Catalog;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::product::{Product, ProductId};
pub use domain::scan::ScanEvent;
pub use errors::LoadError;
