pub mod controller;
pub mod delivery_channel;
pub mod dispatch_service;
pub mod fanout_resolver;
pub mod order_aggregator;
pub mod payload_formatter;
pub mod retry_scheduler;

pub use controller::DispatchController;
pub use delivery_channel::DeliveryChannel;
pub use dispatch_service::NotificationDispatcher;
pub use fanout_resolver::FanoutResolver;
pub use order_aggregator::OrderAggregator;
pub use payload_formatter::{EventPayload, PayloadFormatter};
pub use retry_scheduler::{RetryPolicy, RetryReport, RetryScheduler, RetryState};
