use std::fs;

use tempfile::tempdir;

use crate::config::{ConfigError, ConfigFormat, SubscriberConfig, SubscriptionManifest};
use crate::event::{ListenerSpec, SubscriberBinding};

#[cfg(feature = "toml-config")]
const TOML_MANIFEST: &str = r#"
[[subscribers]]
name = "audit"
stop_propagation = ["on_shutdown"]

[subscribers.events]
"app.start" = "on_start"
"app.shutdown" = ["on_shutdown", 10]
"app.reload" = [["on_reload"], ["on_reload_early", 5]]

[[subscribers]]
name = "metrics"

[subscribers.events]
"app.start" = ["on_start", -5]
"#;

#[cfg(feature = "yaml-config")]
const YAML_MANIFEST: &str = r#"
subscribers:
  - name: audit
    fail: [on_start]
    events:
      app.start: on_start
      app.shutdown: [on_shutdown, 10]
"#;

fn expected_audit() -> SubscriberConfig {
    let mut audit = SubscriberConfig::new("audit")
        .bind("app.start", SubscriberBinding::method("on_start"))
        .bind("app.shutdown", SubscriberBinding::prioritized("on_shutdown", 10))
        .bind(
            "app.reload",
            SubscriberBinding::multi([ListenerSpec::new("on_reload", 0), ListenerSpec::new("on_reload_early", 5)]),
        );
    audit.stop_propagation = vec!["on_shutdown".to_string()];
    audit
}

#[cfg(feature = "toml-config")]
#[test]
fn test_toml_manifest_accepts_all_binding_shapes() {
    let manifest = SubscriptionManifest::from_str(TOML_MANIFEST, ConfigFormat::Toml).unwrap();

    assert_eq!(manifest.subscribers.len(), 2);
    assert_eq!(manifest.subscribers[0], expected_audit());
    assert_eq!(
        manifest.subscribers[1],
        SubscriberConfig::new("metrics").bind("app.start", SubscriberBinding::prioritized("on_start", -5))
    );
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_yaml_manifest() {
    let manifest = SubscriptionManifest::from_str(YAML_MANIFEST, ConfigFormat::Yaml).unwrap();

    let audit = &manifest.subscribers[0];
    assert_eq!(audit.fail, vec!["on_start"]);
    assert!(audit.stop_propagation.is_empty());
    assert_eq!(audit.events["app.shutdown"], SubscriberBinding::prioritized("on_shutdown", 10));
}

#[test]
fn test_json_round_trip_preserves_shapes() {
    let manifest = SubscriptionManifest {
        subscribers: vec![expected_audit()],
    };

    let json = manifest.to_string(ConfigFormat::Json).unwrap();
    assert!(json.contains(r#""app.start": "on_start""#));

    let parsed = SubscriptionManifest::from_str(&json, ConfigFormat::Json).unwrap();
    assert_eq!(parsed, manifest);
}

#[cfg(feature = "toml-config")]
#[test]
fn test_load_from_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("subscriptions.toml");
    fs::write(&path, TOML_MANIFEST).unwrap();

    let manifest = SubscriptionManifest::load(&path).unwrap();

    assert_eq!(manifest.subscribers[0].name, "audit");
}

#[test]
fn test_load_rejects_unknown_extension() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("subscriptions.ini");
    fs::write(&path, "").unwrap();

    assert!(matches!(
        SubscriptionManifest::load(&path),
        Err(ConfigError::UnsupportedFormat(p)) if p == path
    ));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("missing.json");

    let err = SubscriptionManifest::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_invalid_binding_is_a_deserialization_error() {
    let err = SubscriptionManifest::from_str(
        r#"{"subscribers": [{"name": "bad", "events": {"app.start": 42}}]}"#,
        ConfigFormat::Json,
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Deserialization { ref format, .. } if format == "json"));
}

#[test]
fn test_subscribed_events_and_methods() {
    let audit = expected_audit();

    let events = audit.subscribed_events();
    let names: Vec<&str> = events.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["app.reload", "app.shutdown", "app.start"]);

    assert_eq!(
        audit.methods(),
        vec!["on_reload", "on_reload_early", "on_shutdown", "on_start"]
    );
}

#[test]
fn test_empty_manifest() {
    let manifest = SubscriptionManifest::from_str("{}", ConfigFormat::Json).unwrap();
    assert_eq!(manifest, SubscriptionManifest::new());
}
