/// Application configuration file (`config.toml`) loading
pub mod app;

/// Database configuration and connection management
pub mod database;

pub use app::{AppConfig, CategoryConfig, load_config, load_default_config};
pub use database::{DatabaseConfig, create_connection, create_tables};
