pub mod env;
mod loader;

pub use env::{AppConfig, ConfigError, DirectoryConfig, ResilienceConfig};
pub use loader::load_config;
