pub mod app_config;
pub mod database;
pub mod dispatcher;
pub mod logging;

pub use app_config::AppConfig;
pub use database::DatabaseConfig;
pub use dispatcher::DispatcherConfig;
pub use logging::LogConfig;
