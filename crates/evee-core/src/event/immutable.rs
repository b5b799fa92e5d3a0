use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use log::warn;

use crate::event::dispatcher::EventDispatcher;
use crate::event::error::{EventSystemError, Result};
use crate::event::listener::Listener;
use crate::event::subscriber::EventSubscriber;
use crate::event::{Event, Priority};

/// Read-only view over another dispatcher.
///
/// Dispatching and every query are forwarded unchanged. Registration changes
/// are refused with [`EventSystemError::ImmutableDispatcher`] and never reach
/// the wrapped dispatcher, so a component can hand this out while keeping
/// mutation rights on the inner instance.
///
/// `D` is any pointer to a dispatcher: `&DefaultEventDispatcher`,
/// `Box<dyn EventDispatcher>`, `Arc<...>`.
pub struct ImmutableEventDispatcher<D> {
    inner: D,
}

impl<D> ImmutableEventDispatcher<D>
where
    D: Deref,
    D::Target: EventDispatcher,
{
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    /// The wrapped dispatcher, read-only
    pub fn inner(&self) -> &D::Target {
        &self.inner
    }

    fn reject<T>(&self, operation: &'static str) -> Result<T> {
        warn!("Rejected '{}' on immutable event dispatcher", operation);
        Err(EventSystemError::ImmutableDispatcher { operation })
    }
}

impl<D> fmt::Debug for ImmutableEventDispatcher<D>
where
    D: Deref,
    D::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableEventDispatcher")
            .field("inner", &&*self.inner)
            .finish()
    }
}

impl<D> EventDispatcher for ImmutableEventDispatcher<D>
where
    D: Deref,
    D::Target: EventDispatcher,
{
    fn dispatch(&self, event_name: &str, event: &mut dyn Event) -> Result<()> {
        self.inner.dispatch(event_name, event)
    }

    fn get_listeners(&self, event_name: &str) -> Vec<Listener> {
        self.inner.get_listeners(event_name)
    }

    fn get_all_listeners(&self) -> BTreeMap<String, Vec<Listener>> {
        self.inner.get_all_listeners()
    }

    fn get_listener_priority(&self, event_name: &str, listener: &Listener) -> Option<Priority> {
        self.inner.get_listener_priority(event_name, listener)
    }

    fn has_listeners(&self, event_name: &str) -> bool {
        self.inner.has_listeners(event_name)
    }

    fn has_any_listeners(&self) -> bool {
        self.inner.has_any_listeners()
    }

    fn add_listener(&mut self, _event_name: &str, _listener: Listener, _priority: Priority) -> Result<()> {
        self.reject("add_listener")
    }

    fn remove_listener(&mut self, _event_name: &str, _listener: &Listener) -> Result<()> {
        self.reject("remove_listener")
    }

    fn add_subscriber(&mut self, _subscriber: &Arc<dyn EventSubscriber>) -> Result<()> {
        self.reject("add_subscriber")
    }

    fn remove_subscriber(&mut self, _subscriber: &Arc<dyn EventSubscriber>) -> Result<()> {
        self.reject("remove_subscriber")
    }
}
