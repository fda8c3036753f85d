pub mod database;

pub use database::manager::DatabaseManager;
pub use database::sqlite::{
    SqliteContactDirectory, SqliteDeliveryLogRepository, SqliteOrderRepository,
    SqliteStationRepository, SqliteTargetRepository,
};
