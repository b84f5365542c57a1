pub mod database;
pub mod log;
pub mod migration;
pub mod settings;

pub use database::DatabaseConfig;
pub use log::LogConfig;
pub use migration::{MigrationConfig, MigrationOptions};
pub use settings::Settings;
