//! # Event subscribers
//!
//! An [`EventSubscriber`] declares a batch of event-name to method bindings
//! through [`EventSubscriber::subscribed_events`]. The dispatcher resolves
//! each method name to a bound [`Listener`] and registers (or removes) one
//! listener per binding.
//!
//! A binding takes one of three shapes, mirrored by [`SubscriberBinding`]:
//!
//! ```text
//! "on_start"                          single method, priority 0
//! ["on_start", 10]  /  ["on_start"]   method with an explicit priority
//! [["on_start"], ["on_early", 10]]    several methods for the same event
//! ```
//!
//! The same shapes are accepted when bindings are deserialized, so manifests
//! written in JSON, YAML or TOML use them verbatim.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use evee_core::event::{
//!     DefaultEventDispatcher, Event, EventDispatcher, EventSubscriber, Listener,
//!     ListenerResult, SubscribedEvents, SubscriberBinding,
//! };
//!
//! struct Audit;
//!
//! impl Audit {
//!     fn on_start(&self, event: &mut dyn Event, _name: &str, _d: &dyn EventDispatcher) -> ListenerResult {
//!         event.stop_propagation();
//!         Ok(())
//!     }
//! }
//!
//! impl EventSubscriber for Audit {
//!     fn subscribed_events(&self) -> SubscribedEvents {
//!         vec![("app.start".to_string(), SubscriberBinding::prioritized("on_start", 10))]
//!     }
//!
//!     fn resolve(self: Arc<Self>, method: &str) -> Option<Listener> {
//!         match method {
//!             "on_start" => Some(Listener::method(self, method, Self::on_start)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut dispatcher = DefaultEventDispatcher::new();
//! let audit: Arc<dyn EventSubscriber> = Arc::new(Audit);
//! dispatcher.add_subscriber(&audit).unwrap();
//! assert!(dispatcher.has_listeners("app.start"));
//! ```
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::event::error::{EventSystemError, Result};
use crate::event::listener::Listener;
use crate::event::{DEFAULT_PRIORITY, Priority};

/// Ordered mapping from event name to binding
pub type SubscribedEvents = Vec<(String, SubscriberBinding)>;

/// An object that registers a batch of listeners at once.
pub trait EventSubscriber: Send + Sync + 'static {
    /// The bindings this subscriber wants, in registration order
    fn subscribed_events(&self) -> SubscribedEvents;

    /// Resolve a method name to a listener bound to this subscriber.
    ///
    /// Resolving the same name twice must yield equal listeners, which
    /// [`Listener::method`] guarantees. Returning `None` makes registration
    /// fail with [`EventSystemError::UnknownSubscriberMethod`].
    fn resolve(self: Arc<Self>, method: &str) -> Option<Listener>;
}

/// A method name with the priority it should be registered at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSpec", into = "(String, Priority)")]
pub struct ListenerSpec {
    pub method: String,
    pub priority: Priority,
}

impl ListenerSpec {
    pub fn new(method: impl Into<String>, priority: Priority) -> Self {
        Self {
            method: method.into(),
            priority,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpec {
    WithPriority((String, Priority)),
    MethodOnly((String,)),
}

impl From<RawSpec> for ListenerSpec {
    fn from(raw: RawSpec) -> Self {
        match raw {
            RawSpec::WithPriority((method, priority)) => ListenerSpec::new(method, priority),
            RawSpec::MethodOnly((method,)) => ListenerSpec::new(method, DEFAULT_PRIORITY),
        }
    }
}

impl From<ListenerSpec> for (String, Priority) {
    fn from(spec: ListenerSpec) -> Self {
        (spec.method, spec.priority)
    }
}

/// What a subscriber binds to one event name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubscriberBinding {
    /// One method at the default priority
    Single(String),
    /// One method at an explicit priority
    Prioritized(ListenerSpec),
    /// Several methods, registered in sequence order
    Multi(Vec<ListenerSpec>),
}

impl SubscriberBinding {
    pub fn method(method: impl Into<String>) -> Self {
        SubscriberBinding::Single(method.into())
    }

    pub fn prioritized(method: impl Into<String>, priority: Priority) -> Self {
        SubscriberBinding::Prioritized(ListenerSpec::new(method, priority))
    }

    pub fn multi(specs: impl IntoIterator<Item = ListenerSpec>) -> Self {
        SubscriberBinding::Multi(specs.into_iter().collect())
    }

    /// Flatten into individual specs, in registration order
    pub fn specs(&self) -> Vec<ListenerSpec> {
        match self {
            SubscriberBinding::Single(method) => vec![ListenerSpec::new(method.clone(), DEFAULT_PRIORITY)],
            SubscriberBinding::Prioritized(spec) => vec![spec.clone()],
            SubscriberBinding::Multi(specs) => specs.clone(),
        }
    }
}

/// A binding with its method already resolved to a listener.
pub(crate) struct ResolvedBinding {
    pub(crate) event_name: String,
    pub(crate) listener: Listener,
    pub(crate) priority: Priority,
}

/// Resolve every declared binding up front so that a bad method name leaves
/// the registry untouched.
pub(crate) fn resolve_bindings(subscriber: &Arc<dyn EventSubscriber>) -> Result<Vec<ResolvedBinding>> {
    let mut resolved = Vec::new();
    for (event_name, binding) in subscriber.subscribed_events() {
        for spec in binding.specs() {
            let listener = Arc::clone(subscriber).resolve(&spec.method).ok_or_else(|| {
                EventSystemError::UnknownSubscriberMethod {
                    event_name: event_name.clone(),
                    method: spec.method.clone(),
                }
            })?;
            resolved.push(ResolvedBinding {
                event_name: event_name.clone(),
                listener,
                priority: spec.priority,
            });
        }
    }
    Ok(resolved)
}
