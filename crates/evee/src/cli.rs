use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use evee_core::config::SubscriptionManifest;
use evee_core::event::{
    DefaultEventDispatcher, Event, EventDispatcher, EventDispatcherExt, EventSubscriber, GenericEvent,
    ImmutableEventDispatcher,
};
use log::{debug, info};
use serde_json::Value;

use crate::trace::{TRACE_ARGUMENT, TraceSubscriber};

pub type CliResult<T> = Result<T, Box<dyn Error>>;

/// Load a manifest and register one trace subscriber per entry.
pub fn build_dispatcher(manifest_path: &Path) -> CliResult<DefaultEventDispatcher> {
    let manifest = SubscriptionManifest::load(manifest_path)?;
    let mut dispatcher = DefaultEventDispatcher::new();

    for config in manifest.subscribers {
        let subscriber = TraceSubscriber::new(config);
        info!("Registering subscriber '{}'", subscriber.name());
        let subscriber: Arc<dyn EventSubscriber> = subscriber;
        dispatcher.add_subscriber(&subscriber)?;
    }

    debug!("Dispatcher ready: {:?}", dispatcher);
    Ok(dispatcher)
}

/// `evee listeners`
pub fn list_listeners(manifest_path: &Path, event: Option<&str>) -> CliResult<()> {
    let dispatcher = build_dispatcher(manifest_path)?;

    let event_names: Vec<String> = match event {
        Some(event_name) => {
            if !dispatcher.has_listeners(event_name) {
                println!("No listeners registered for '{}'.", event_name);
                return Ok(());
            }
            vec![event_name.to_string()]
        }
        None => dispatcher.get_all_listeners().into_keys().collect(),
    };

    if event_names.is_empty() {
        println!("No listeners registered.");
        return Ok(());
    }

    for event_name in &event_names {
        println!("{}", event_name);
        for (priority, listener) in dispatcher.get_listeners_with_priorities(event_name) {
            println!("  [{}] {}", priority, listener.label().unwrap_or("<anonymous>"));
        }
    }
    Ok(())
}

/// `evee dispatch`
pub fn dispatch(manifest_path: &Path, event_name: &str, arguments: Vec<(String, Value)>) -> CliResult<()> {
    let dispatcher = build_dispatcher(manifest_path)?;
    // Dispatch goes through a view that refuses registration changes
    let view = ImmutableEventDispatcher::new(&dispatcher);

    let arguments: HashMap<String, Value> = arguments.into_iter().collect();
    let event = view.dispatch_event(event_name, GenericEvent::from_arguments(arguments))?;

    println!("Dispatched '{}'", event_name);

    let invoked: Vec<String> = match event.get_argument(TRACE_ARGUMENT) {
        Ok(Value::Array(items)) => items.iter().map(display_value).collect(),
        _ => Vec::new(),
    };
    if invoked.is_empty() {
        println!("Invoked listeners: none");
    } else {
        println!("Invoked listeners:");
        for label in invoked {
            println!("  - {}", label);
        }
    }

    println!(
        "Propagation stopped: {}",
        if event.is_propagation_stopped() { "yes" } else { "no" }
    );

    let sorted: BTreeMap<&String, &Value> = event.iter().collect();
    if sorted.is_empty() {
        println!("Arguments: none");
    } else {
        println!("Arguments:");
        for (key, value) in sorted {
            println!("  {} = {}", key, value);
        }
    }
    Ok(())
}

/// Parse `KEY=VALUE`; the value is read as JSON when it parses, as a string otherwise.
pub fn parse_argument(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid argument '{}': expected KEY=VALUE", raw))?;
    if key.is_empty() {
        return Err(format!("invalid argument '{}': empty key", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_argument() {
        assert_eq!(parse_argument("count=3").unwrap(), ("count".to_string(), json!(3)));
        assert_eq!(parse_argument("user=alice").unwrap(), ("user".to_string(), json!("alice")));
        assert_eq!(parse_argument("flags=[1,true]").unwrap(), ("flags".to_string(), json!([1, true])));
        assert_eq!(parse_argument("expr=a=b").unwrap(), ("expr".to_string(), json!("a=b")));
        assert_eq!(parse_argument("empty=").unwrap(), ("empty".to_string(), json!("")));
    }

    #[test]
    fn test_parse_argument_rejects_malformed_input() {
        assert!(parse_argument("novalue").is_err());
        assert!(parse_argument("=3").is_err());
    }
}
