//! # evee-core
//!
//! In-process event dispatching: named events broadcast to prioritized
//! listeners, subscribers that register batches of listeners, and a read-only
//! dispatcher view for consumers that must not change registrations.
pub mod config;
pub mod event;

// Re-export key public types/traits for easier use by the binary and hosts
pub use config::{ConfigFormat, SubscriptionManifest};
pub use event::{
    BaseEvent, DefaultEventDispatcher, Event, EventDispatcher, EventDispatcherExt, EventSubscriber,
    EventSystemError, GenericEvent, ImmutableEventDispatcher, Listener, SharedEventDispatcher,
};
