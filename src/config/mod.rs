pub mod env;
mod loader;

pub use env::{AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, LoggingConfig};
pub use loader::{load_config, parse_base_url};
