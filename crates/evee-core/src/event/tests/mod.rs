#[cfg(test)]
mod error_tests;

use std::sync::{Arc, Mutex};

use crate::event::Listener;

/// Invocation log shared between a test and its listeners
pub(crate) type Log = Arc<Mutex<Vec<String>>>;

pub(crate) fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Listener that appends `name` to `log`
pub(crate) fn recorder(log: &Log, name: &str) -> Listener {
    let log = Arc::clone(log);
    let name = name.to_string();
    Listener::infallible(move |_event, _event_name, _dispatcher| log.lock().unwrap().push(name.clone()))
}

/// Listener that appends `name` to `log` and then stops propagation
pub(crate) fn stopper(log: &Log, name: &str) -> Listener {
    let log = Arc::clone(log);
    let name = name.to_string();
    Listener::infallible(move |event, _event_name, _dispatcher| {
        log.lock().unwrap().push(name.clone());
        event.stop_propagation();
    })
}

/// Listener that does nothing
pub(crate) fn noop() -> Listener {
    Listener::infallible(|_event, _event_name, _dispatcher| {})
}

#[cfg(test)]
mod tests {
    use crate::event::{BaseEvent, DEFAULT_PRIORITY, Event};

    #[test]
    fn test_default_priority() {
        assert_eq!(DEFAULT_PRIORITY, 0);
    }

    #[test]
    fn test_base_event_propagation_flag() {
        let mut event = BaseEvent::new();
        assert!(!event.is_propagation_stopped());

        event.stop_propagation();
        assert!(event.is_propagation_stopped());

        // Downcasting through the trait object
        let as_dyn: &dyn Event = &event;
        assert!(as_dyn.as_any().downcast_ref::<BaseEvent>().is_some());
    }

    #[test]
    fn test_base_event_equality() {
        assert_eq!(BaseEvent::new(), BaseEvent::default());

        let mut stopped = BaseEvent::new();
        stopped.stop_propagation();
        assert_ne!(stopped, BaseEvent::new());
    }
}
