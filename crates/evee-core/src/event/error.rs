//! # Evee Event System Errors
//!
//! Defines error types specific to the event system.
//!
//! This module includes [`EventSystemError`], the enum covering every failure
//! the dispatcher and its carriers can report: missing event arguments,
//! mutations rejected by a read-only dispatcher, listener failures that abort
//! a dispatch, subscriber bindings that do not resolve, and poisoned locks in
//! the shared wrapper.
//!
//! Lookups of unknown event names or absent listeners are deliberately not
//! represented here; the registry answers those with empty results.
use thiserror::Error;

/// Error type returned by listener callbacks.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Event argument '{key}' not found")]
    ArgumentNotFound { key: String },

    #[error("Illegal mutation: '{operation}' is not permitted on an immutable event dispatcher")]
    ImmutableDispatcher { operation: &'static str },

    #[error("Listener for event '{event_name}' failed: {source}")]
    ListenerFailed {
        event_name: String,
        #[source]
        source: ListenerError,
    },

    #[error("Subscriber method '{method}' bound to event '{event_name}' could not be resolved")]
    UnknownSubscriberMethod { event_name: String, method: String },

    #[error("Attempted to operate on a poisoned event dispatcher component: {component}")]
    DispatcherPoisoned { component: String },
}

impl EventSystemError {
    pub fn argument_not_found(key: impl Into<String>) -> Self {
        EventSystemError::ArgumentNotFound { key: key.into() }
    }

    /// True for the error raised by [`ImmutableEventDispatcher`](crate::event::ImmutableEventDispatcher).
    pub fn is_illegal_mutation(&self) -> bool {
        matches!(self, EventSystemError::ImmutableDispatcher { .. })
    }
}

/// Shorthand for Result with the event system error type
pub type Result<T> = std::result::Result<T, EventSystemError>;
