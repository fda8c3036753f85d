//! Shared test doubles for the notifier workspace.
//!
//! In-memory mock implementations of the repository traits plus builder
//! helpers for constructing test entities with sensible defaults.

pub mod builders;
pub mod mocks;

pub use builders::{ContactBuilder, InspectionAlertBuilder, OrderBuilder, StationBuilder, TargetBuilder};
pub use mocks::{
    MockContactDirectory, MockDeliveryLog, MockOrderRepository, MockStationRepository,
    MockTargetRepository,
};
