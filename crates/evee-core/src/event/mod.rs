//! # Evee Event System
//!
//! Named events are broadcast to listeners registered on a dispatcher.
//! Listeners run synchronously in priority order (higher first, ties in
//! registration order) and any of them may stop propagation for the rest.
//!
//! - [`Event`] is the carrier contract; [`BaseEvent`] is the plain carrier and
//!   [`GenericEvent`] adds a subject plus named arguments.
//! - [`Listener`] is an identity-compared callback handle.
//! - [`EventDispatcher`] is the dispatcher contract, implemented by
//!   [`DefaultEventDispatcher`] and the read-only [`ImmutableEventDispatcher`].
//! - [`EventSubscriber`] lets an object declare a batch of bindings at once.
//! - [`SharedEventDispatcher`] puts a dispatcher behind a lock for hosts that
//!   need to share one across threads.
pub mod dispatcher;
pub mod error;
pub mod generic;
pub mod immutable;
pub mod listener;
mod registry;
pub mod shared;
pub mod subscriber;

use std::any::Any;
use std::fmt;

/// Listener priority. Higher values are delivered earlier.
pub type Priority = i32;

/// Priority used when none is given.
pub const DEFAULT_PRIORITY: Priority = 0;

/// Core event trait
pub trait Event: Any + fmt::Debug {
    /// Whether a listener has asked to halt further delivery
    fn is_propagation_stopped(&self) -> bool;

    /// Halt delivery to the listeners that have not run yet
    fn stop_propagation(&mut self);

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Cast to mutable Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Plain event carrying only propagation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseEvent {
    propagation_stopped: bool,
}

impl BaseEvent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Event for BaseEvent {
    fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Re-export important types
pub use dispatcher::{DefaultEventDispatcher, EventDispatcher, EventDispatcherExt};
pub use error::{EventSystemError, ListenerError, Result};
pub use generic::GenericEvent;
pub use immutable::ImmutableEventDispatcher;
pub use listener::{Listener, ListenerResult};
pub use shared::{SharedEventDispatcher, create_dispatcher};
pub use subscriber::{EventSubscriber, ListenerSpec, SubscribedEvents, SubscriberBinding};

// Test module declaration
#[cfg(test)]
mod tests;
