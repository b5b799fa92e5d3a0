use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::event::dispatcher::{DefaultEventDispatcher, EventDispatcher};
use crate::event::error::{EventSystemError, Result};
use crate::event::listener::Listener;
use crate::event::subscriber::EventSubscriber;
use crate::event::{Event, Priority};

/// Lock-protected dispatcher that can be cloned across threads.
///
/// Every call takes the lock for its whole duration, including the listener
/// invocations of a dispatch. Listeners get the inner dispatcher as
/// `&dyn EventDispatcher` and must not call back into the shared handle, which
/// would deadlock.
#[derive(Clone, Default)]
pub struct SharedEventDispatcher {
    dispatcher: Arc<Mutex<DefaultEventDispatcher>>,
}

// Manual Debug impl for SharedEventDispatcher
impl fmt::Debug for SharedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventDispatcher").finish_non_exhaustive()
    }
}

impl SharedEventDispatcher {
    pub fn new() -> Self {
        Self::from_dispatcher(DefaultEventDispatcher::new())
    }

    pub fn from_dispatcher(dispatcher: DefaultEventDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
        }
    }

    /// Run `f` with exclusive access to the dispatcher
    pub fn with<R>(&self, f: impl FnOnce(&mut DefaultEventDispatcher) -> R) -> Result<R> {
        let mut dispatcher = self.lock()?;
        Ok(f(&mut dispatcher))
    }

    pub fn dispatch(&self, event_name: &str, event: &mut dyn Event) -> Result<()> {
        self.lock()?.dispatch(event_name, event)
    }

    pub fn add_listener(&self, event_name: &str, listener: Listener, priority: Priority) -> Result<()> {
        self.lock()?.add_listener(event_name, listener, priority)
    }

    pub fn remove_listener(&self, event_name: &str, listener: &Listener) -> Result<()> {
        self.lock()?.remove_listener(event_name, listener)
    }

    pub fn add_subscriber(&self, subscriber: &Arc<dyn EventSubscriber>) -> Result<()> {
        self.lock()?.add_subscriber(subscriber)
    }

    pub fn remove_subscriber(&self, subscriber: &Arc<dyn EventSubscriber>) -> Result<()> {
        self.lock()?.remove_subscriber(subscriber)
    }

    pub fn has_listeners(&self, event_name: &str) -> Result<bool> {
        Ok(self.lock()?.has_listeners(event_name))
    }

    pub fn get_listeners(&self, event_name: &str) -> Result<Vec<Listener>> {
        Ok(self.lock()?.get_listeners(event_name))
    }

    fn lock(&self) -> Result<MutexGuard<'_, DefaultEventDispatcher>> {
        self.dispatcher
            .lock()
            .map_err(|_| EventSystemError::DispatcherPoisoned {
                component: "listener_registry".to_string(),
            })
    }
}

/// Create a new shared event dispatcher instance
pub fn create_dispatcher() -> SharedEventDispatcher {
    SharedEventDispatcher::new()
}
