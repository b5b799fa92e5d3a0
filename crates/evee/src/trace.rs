use std::sync::Arc;

use evee_core::config::SubscriberConfig;
use evee_core::event::{Event, EventSubscriber, GenericEvent, Listener, ListenerResult, SubscribedEvents};
use log::debug;
use serde_json::Value;

/// Argument that collects the labels of invoked trace listeners
pub const TRACE_ARGUMENT: &str = "trace";

/// What a trace listener does after recording itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Continue,
    StopPropagation,
    Fail,
}

/// Subscriber built from one manifest entry.
///
/// Every method named in the entry's bindings resolves to a listener that
/// appends `subscriber::method` to the event's `trace` argument, then stops
/// propagation or fails when the manifest asks it to.
#[derive(Debug)]
pub struct TraceSubscriber {
    config: SubscriberConfig,
}

impl TraceSubscriber {
    pub fn new(config: SubscriberConfig) -> Arc<Self> {
        Arc::new(Self { config })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    fn label(&self, method: &str) -> String {
        format!("{}::{}", self.config.name, method)
    }

    fn behavior(&self, method: &str) -> Behavior {
        // Failing wins over stopping when a method is listed in both
        if self.config.fail.iter().any(|m| m == method) {
            Behavior::Fail
        } else if self.config.stop_propagation.iter().any(|m| m == method) {
            Behavior::StopPropagation
        } else {
            Behavior::Continue
        }
    }

    fn handle(&self, method: &str, behavior: Behavior, event: &mut dyn Event, event_name: &str) -> ListenerResult {
        let label = self.label(method);
        debug!("{} handling '{}'", label, event_name);

        if let Some(generic) = event.as_any_mut().downcast_mut::<GenericEvent>() {
            record(generic, &label);
        }

        match behavior {
            Behavior::Continue => Ok(()),
            Behavior::StopPropagation => {
                event.stop_propagation();
                Ok(())
            }
            Behavior::Fail => Err(format!("{} is configured to fail", label).into()),
        }
    }
}

impl EventSubscriber for TraceSubscriber {
    fn subscribed_events(&self) -> SubscribedEvents {
        self.config.subscribed_events()
    }

    fn resolve(self: Arc<Self>, method: &str) -> Option<Listener> {
        if !self.config.methods().iter().any(|m| m == method) {
            return None;
        }

        let label = self.label(method);
        let behavior = self.behavior(method);
        let name = method.to_string();
        let listener = Listener::method(self, method, move |subscriber, event, event_name, _dispatcher| {
            subscriber.handle(&name, behavior, event, event_name)
        });
        Some(listener.with_label(label))
    }
}

/// Append `label` to the trace argument, keeping whatever was there before.
fn record(event: &mut GenericEvent, label: &str) {
    let mut trace = match event.remove_argument(TRACE_ARGUMENT) {
        Ok(Value::Array(items)) => items,
        Ok(other) => vec![other],
        Err(_) => Vec::new(),
    };
    trace.push(Value::from(label));
    event.set_argument(TRACE_ARGUMENT, trace);
}
