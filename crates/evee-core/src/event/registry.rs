use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use log::trace;

use crate::event::listener::Listener;
use crate::event::Priority;

/// Listeners of one event name, bucketed by priority.
type Buckets = BTreeMap<Priority, Vec<Listener>>;

/// Priority-bucketed listener storage plus a lazily built, flattened
/// ordering per event name.
///
/// A cache entry is either absent or exactly the flattening of the current
/// buckets for that name. Every mutation drops the affected entry.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: HashMap<String, Buckets>,
    sorted: RefCell<HashMap<String, Vec<Listener>>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, event_name: &str, listener: Listener, priority: Priority) {
        self.listeners
            .entry(event_name.to_string())
            .or_default()
            .entry(priority)
            .or_default()
            .push(listener);
        self.invalidate(event_name);
    }

    /// Remove the first occurrence of `listener`, scanning buckets in
    /// ascending priority. Returns the priority it was removed from.
    ///
    /// An event name whose last listener goes away is forgotten entirely.
    pub(crate) fn remove(&mut self, event_name: &str, listener: &Listener) -> Option<Priority> {
        let buckets = self.listeners.get_mut(event_name)?;
        let (priority, index) = buckets.iter().find_map(|(priority, bucket)| {
            bucket.iter().position(|l| l == listener).map(|index| (*priority, index))
        })?;

        if let Some(bucket) = buckets.get_mut(&priority) {
            bucket.remove(index);
            if bucket.is_empty() {
                buckets.remove(&priority);
            }
        }
        if buckets.is_empty() {
            self.listeners.remove(event_name);
        }
        self.invalidate(event_name);
        Some(priority)
    }

    /// Priority of the first occurrence, same scan order as [`Self::remove`].
    pub(crate) fn priority_of(&self, event_name: &str, listener: &Listener) -> Option<Priority> {
        self.listeners
            .get(event_name)?
            .iter()
            .find(|(_, bucket)| bucket.contains(listener))
            .map(|(priority, _)| *priority)
    }

    /// Sorted listeners for one event name; empty when the name is unknown.
    pub(crate) fn sorted(&self, event_name: &str) -> Vec<Listener> {
        let Some(buckets) = self.listeners.get(event_name) else {
            return Vec::new();
        };
        self.sorted
            .borrow_mut()
            .entry(event_name.to_string())
            .or_insert_with(|| {
                trace!("Rebuilding sorted listener cache for '{}'", event_name);
                flatten(buckets)
            })
            .clone()
    }

    /// Dispatch order paired with the priority of each registration.
    ///
    /// Read straight from the buckets, so a listener registered at several
    /// priorities reports each of them.
    pub(crate) fn sorted_with_priorities(&self, event_name: &str) -> Vec<(Priority, Listener)> {
        self.listeners
            .get(event_name)
            .map(|buckets| {
                buckets
                    .iter()
                    .rev()
                    .flat_map(|(priority, bucket)| bucket.iter().map(move |l| (*priority, l.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sorted listeners for every known event name that still has any.
    pub(crate) fn all_sorted(&self) -> BTreeMap<String, Vec<Listener>> {
        self.listeners
            .keys()
            .map(|event_name| (event_name.clone(), self.sorted(event_name)))
            .filter(|(_, listeners)| !listeners.is_empty())
            .collect()
    }

    pub(crate) fn event_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners
            .values()
            .flat_map(|buckets| buckets.values())
            .map(Vec::len)
            .sum()
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, event_name: &str) -> bool {
        self.sorted.borrow().contains_key(event_name)
    }

    fn invalidate(&mut self, event_name: &str) {
        self.sorted.get_mut().remove(event_name);
    }
}

/// Descending priority, insertion order inside a bucket.
fn flatten(buckets: &Buckets) -> Vec<Listener> {
    buckets.values().rev().flat_map(|bucket| bucket.iter().cloned()).collect()
}
