pub mod aggregation;
pub mod contact;
pub mod delivery;
pub mod inspection;
pub mod order;
pub mod station;
pub mod target;

pub use aggregation::{OrderAggregation, OrderSummary, StationOrderGroup};
pub use contact::Contact;
pub use delivery::{DeliveryAttempt, DeliveryOutcome, DispatchReport, RecipientAddress};
pub use inspection::{InspectionAlert, WaterReading};
pub use order::{OrderRecord, OrderStatus};
pub use station::Station;
pub use target::{
    AuthDescriptor, EventType, HttpMethod, IntegrationKind, NotificationTarget,
    RecipientSelection,
};
