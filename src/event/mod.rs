//! Event system: injected event bus, type-erased arguments, observers.

pub mod args;
pub mod bus;
pub mod observable;

pub use args::EventArgs;
pub use bus::{EventBus, Outcome, Subscriber, SubscriptionId};
pub use observable::{Observable, ObserverId};
