pub mod errors;
pub mod models;
pub mod repositories;

pub use errors::{NotifierError, NotifierResult};
pub use models::*;
pub use repositories::*;
