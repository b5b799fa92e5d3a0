#![cfg(test)]

use std::error::Error as _;

use crate::event::EventSystemError;

#[test]
fn test_event_system_error_display() {
    let err_missing = EventSystemError::argument_not_found("name");
    assert_eq!(format!("{}", err_missing), "Event argument 'name' not found");

    let err_immutable = EventSystemError::ImmutableDispatcher { operation: "remove_subscriber" };
    assert_eq!(
        format!("{}", err_immutable),
        "Illegal mutation: 'remove_subscriber' is not permitted on an immutable event dispatcher"
    );

    let err_listener = EventSystemError::ListenerFailed {
        event_name: "app.start".to_string(),
        source: "disk full".into(),
    };
    assert_eq!(
        format!("{}", err_listener),
        "Listener for event 'app.start' failed: disk full"
    );

    let err_method = EventSystemError::UnknownSubscriberMethod {
        event_name: "app.start".to_string(),
        method: "on_start".to_string(),
    };
    assert_eq!(
        format!("{}", err_method),
        "Subscriber method 'on_start' bound to event 'app.start' could not be resolved"
    );

    let err_poisoned = EventSystemError::DispatcherPoisoned {
        component: "listener_registry".to_string(),
    };
    assert_eq!(
        format!("{}", err_poisoned),
        "Attempted to operate on a poisoned event dispatcher component: listener_registry"
    );
}

#[test]
fn test_listener_failure_keeps_source() {
    let err = EventSystemError::ListenerFailed {
        event_name: "app.start".to_string(),
        source: "disk full".into(),
    };

    let source = err.source().expect("ListenerFailed should expose its source");
    assert_eq!(source.to_string(), "disk full");
    assert!(!err.is_illegal_mutation());
}
