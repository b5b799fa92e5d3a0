use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;

use serde_json::Value;

use crate::event::error::{EventSystemError, Result};
use crate::event::Event;

/// Event carrying a subject and a set of named arguments.
///
/// The subject is fixed at construction. Arguments are free-form JSON values
/// keyed by name; reading or removing a key that is not present fails with
/// [`EventSystemError::ArgumentNotFound`], every other accessor is total.
#[derive(Clone, PartialEq)]
pub struct GenericEvent<S = ()> {
    subject: S,
    arguments: HashMap<String, Value>,
    propagation_stopped: bool,
}

impl<S> GenericEvent<S> {
    /// Create an event for `subject` with the given arguments
    pub fn new(subject: S, arguments: HashMap<String, Value>) -> Self {
        Self {
            subject,
            arguments,
            propagation_stopped: false,
        }
    }

    /// Create an event for `subject` with no arguments
    pub fn with_subject(subject: S) -> Self {
        Self::new(subject, HashMap::new())
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    pub fn arguments(&self) -> &HashMap<String, Value> {
        &self.arguments
    }

    /// Replace the whole argument map
    pub fn set_arguments(&mut self, arguments: HashMap<String, Value>) -> &mut Self {
        self.arguments = arguments;
        self
    }

    pub fn get_argument(&self, key: &str) -> Result<&Value> {
        self.arguments
            .get(key)
            .ok_or_else(|| EventSystemError::argument_not_found(key))
    }

    /// Insert or overwrite a single argument
    pub fn set_argument(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Remove an argument, returning its value
    pub fn remove_argument(&mut self, key: &str) -> Result<Value> {
        self.arguments
            .remove(key)
            .ok_or_else(|| EventSystemError::argument_not_found(key))
    }

    pub fn has_argument(&self, key: &str) -> bool {
        self.arguments.contains_key(key)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.arguments.iter()
    }
}

impl GenericEvent<()> {
    /// Create a subject-less event from arguments
    pub fn from_arguments(arguments: HashMap<String, Value>) -> Self {
        Self::new((), arguments)
    }
}

impl<S: Default> Default for GenericEvent<S> {
    fn default() -> Self {
        Self::with_subject(S::default())
    }
}

impl<'a, S> IntoIterator for &'a GenericEvent<S> {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.iter()
    }
}

impl<S: fmt::Debug> fmt::Debug for GenericEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericEvent")
            .field("subject", &self.subject)
            .field("arguments", &self.arguments)
            .field("propagation_stopped", &self.propagation_stopped)
            .finish()
    }
}

impl<S: fmt::Debug + 'static> Event for GenericEvent<S> {
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
