pub mod sqlite_contact_directory;
pub mod sqlite_delivery_log_repository;
pub mod sqlite_order_repository;
pub mod sqlite_station_repository;
pub mod sqlite_target_repository;

pub use sqlite_contact_directory::SqliteContactDirectory;
pub use sqlite_delivery_log_repository::SqliteDeliveryLogRepository;
pub use sqlite_order_repository::SqliteOrderRepository;
pub use sqlite_station_repository::SqliteStationRepository;
pub use sqlite_target_repository::SqliteTargetRepository;
