//! In-process change notification.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//!   Repositories publish a [`DomainEvent`] after every write.
//! - [`EventLogger`]: background subscriber that traces every event.

pub mod bus;
pub mod logger;

pub use bus::{DomainEvent, EventBus};
pub use logger::EventLogger;
