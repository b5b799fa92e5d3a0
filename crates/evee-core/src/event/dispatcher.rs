use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::event::error::{EventSystemError, Result};
use crate::event::listener::Listener;
use crate::event::registry::ListenerRegistry;
use crate::event::subscriber::{self, EventSubscriber};
use crate::event::{BaseEvent, DEFAULT_PRIORITY, Event, Priority};

/// Dispatcher contract shared by the default dispatcher and its decorators.
///
/// Read operations take `&self`; registration changes take `&mut self` and
/// report failure through [`Result`] so that read-only implementations can
/// refuse them. The trait is dyn-compatible: listeners receive the dispatcher
/// that invoked them as `&dyn EventDispatcher`.
pub trait EventDispatcher {
    /// Deliver `event` to the listeners of `event_name` in priority order,
    /// stopping early once a listener stops propagation.
    fn dispatch(&self, event_name: &str, event: &mut dyn Event) -> Result<()>;

    /// Listeners for `event_name` in dispatch order
    fn get_listeners(&self, event_name: &str) -> Vec<Listener>;

    /// Listeners for every event name that currently has any
    fn get_all_listeners(&self) -> BTreeMap<String, Vec<Listener>>;

    /// Priority of the first registration of `listener`, if any
    fn get_listener_priority(&self, event_name: &str, listener: &Listener) -> Option<Priority>;

    fn has_listeners(&self, event_name: &str) -> bool {
        !self.get_listeners(event_name).is_empty()
    }

    fn has_any_listeners(&self) -> bool {
        !self.get_all_listeners().is_empty()
    }

    fn add_listener(&mut self, event_name: &str, listener: Listener, priority: Priority) -> Result<()>;

    /// Remove the first registration of `listener`. Unknown names and absent
    /// listeners are not errors.
    fn remove_listener(&mut self, event_name: &str, listener: &Listener) -> Result<()>;

    fn add_subscriber(&mut self, subscriber: &Arc<dyn EventSubscriber>) -> Result<()>;

    fn remove_subscriber(&mut self, subscriber: &Arc<dyn EventSubscriber>) -> Result<()>;
}

/// Convenience methods available on every dispatcher, including trait objects.
pub trait EventDispatcherExt: EventDispatcher {
    /// Dispatch an owned event and hand it back afterwards
    fn dispatch_event<E: Event>(&self, event_name: &str, mut event: E) -> Result<E> {
        self.dispatch(event_name, &mut event)?;
        Ok(event)
    }

    /// Dispatch a freshly constructed [`BaseEvent`]
    fn dispatch_default(&self, event_name: &str) -> Result<BaseEvent> {
        self.dispatch_event(event_name, BaseEvent::new())
    }

    /// Register at [`DEFAULT_PRIORITY`]
    fn add_default_listener(&mut self, event_name: &str, listener: Listener) -> Result<()> {
        self.add_listener(event_name, listener, DEFAULT_PRIORITY)
    }
}

impl<T: EventDispatcher + ?Sized> EventDispatcherExt for T {}

/// Standard dispatcher owning a listener registry.
///
/// Not synchronized: wrap it in a [`SharedEventDispatcher`](crate::event::SharedEventDispatcher)
/// or lock it externally when it has to be shared between threads.
#[derive(Default)]
pub struct DefaultEventDispatcher {
    registry: ListenerRegistry,
}

// Manual Debug implementation for DefaultEventDispatcher
impl fmt::Debug for DefaultEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultEventDispatcher")
            .field("event_names_count", &self.registry.event_count())
            .field("listeners_count", &self.registry.listener_count())
            .finish()
    }
}

impl DefaultEventDispatcher {
    pub fn new() -> Self {
        Self {
            registry: ListenerRegistry::new(),
        }
    }

    /// Invoke `listeners` in order until one stops propagation or fails.
    fn do_dispatch(&self, listeners: &[Listener], event_name: &str, event: &mut dyn Event) -> Result<()> {
        for (position, listener) in listeners.iter().enumerate() {
            trace!("Invoking listener {:?} for '{}'", listener, event_name);
            listener
                .call(event, event_name, self)
                .map_err(|source| EventSystemError::ListenerFailed {
                    event_name: event_name.to_string(),
                    source,
                })?;
            if event.is_propagation_stopped() {
                debug!(
                    "Propagation of '{}' stopped after {} of {} listeners",
                    event_name,
                    position + 1,
                    listeners.len()
                );
                break;
            }
        }
        Ok(())
    }

    /// Listeners for `event_name` in dispatch order, each with the priority
    /// of that particular registration.
    ///
    /// Unlike [`EventDispatcher::get_listener_priority`], a listener registered
    /// at several priorities is reported once per registration with its own
    /// priority.
    pub fn get_listeners_with_priorities(&self, event_name: &str) -> Vec<(Priority, Listener)> {
        self.registry.sorted_with_priorities(event_name)
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, event_name: &str) -> bool {
        self.registry.is_cached(event_name)
    }
}

impl EventDispatcher for DefaultEventDispatcher {
    fn dispatch(&self, event_name: &str, event: &mut dyn Event) -> Result<()> {
        let listeners = self.registry.sorted(event_name);
        if listeners.is_empty() {
            trace!("No listeners for '{}'", event_name);
            return Ok(());
        }
        self.do_dispatch(&listeners, event_name, event)
    }

    fn get_listeners(&self, event_name: &str) -> Vec<Listener> {
        self.registry.sorted(event_name)
    }

    fn get_all_listeners(&self) -> BTreeMap<String, Vec<Listener>> {
        self.registry.all_sorted()
    }

    fn get_listener_priority(&self, event_name: &str, listener: &Listener) -> Option<Priority> {
        self.registry.priority_of(event_name, listener)
    }

    fn add_listener(&mut self, event_name: &str, listener: Listener, priority: Priority) -> Result<()> {
        debug!("Adding listener {:?} to '{}' at priority {}", listener, event_name, priority);
        self.registry.add(event_name, listener, priority);
        Ok(())
    }

    fn remove_listener(&mut self, event_name: &str, listener: &Listener) -> Result<()> {
        match self.registry.remove(event_name, listener) {
            Some(priority) => debug!(
                "Removed listener {:?} from '{}' at priority {}",
                listener, event_name, priority
            ),
            None => trace!("Listener {:?} not registered for '{}'", listener, event_name),
        }
        Ok(())
    }

    fn add_subscriber(&mut self, subscriber: &Arc<dyn EventSubscriber>) -> Result<()> {
        let bindings = subscriber::resolve_bindings(subscriber)?;
        debug!("Adding subscriber with {} binding(s)", bindings.len());
        for binding in bindings {
            self.add_listener(&binding.event_name, binding.listener, binding.priority)?;
        }
        Ok(())
    }

    fn remove_subscriber(&mut self, subscriber: &Arc<dyn EventSubscriber>) -> Result<()> {
        let bindings = subscriber::resolve_bindings(subscriber)?;
        debug!("Removing subscriber with {} binding(s)", bindings.len());
        for binding in bindings {
            self.remove_listener(&binding.event_name, &binding.listener)?;
        }
        Ok(())
    }
}
