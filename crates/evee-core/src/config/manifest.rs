use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigFormat};
use crate::event::{SubscribedEvents, SubscriberBinding};

/// A file listing subscribers and what they bind to.
///
/// ```toml
/// [[subscribers]]
/// name = "audit"
/// stop_propagation = ["on_shutdown"]
///
/// [subscribers.events]
/// "app.start" = "on_start"
/// "app.shutdown" = ["on_shutdown", 10]
/// "app.reload" = [["on_reload"], ["on_reload_early", 5]]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionManifest {
    #[serde(default)]
    pub subscribers: Vec<SubscriberConfig>,
}

/// One declared subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberConfig {
    /// Name used in listener labels
    pub name: String,
    /// Event name to binding
    #[serde(default)]
    pub events: BTreeMap<String, SubscriberBinding>,
    /// Methods that stop propagation after running
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_propagation: Vec<String>,
    /// Methods that fail when invoked
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail: Vec<String>,
}

impl SubscriberConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: BTreeMap::new(),
            stop_propagation: Vec::new(),
            fail: Vec::new(),
        }
    }

    pub fn bind(mut self, event_name: impl Into<String>, binding: SubscriberBinding) -> Self {
        self.events.insert(event_name.into(), binding);
        self
    }

    /// Bindings in the form a subscriber reports them
    pub fn subscribed_events(&self) -> SubscribedEvents {
        self.events
            .iter()
            .map(|(event_name, binding)| (event_name.clone(), binding.clone()))
            .collect()
    }

    /// Every method name referenced by the bindings
    pub fn methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self
            .events
            .values()
            .flat_map(|binding| binding.specs())
            .map(|spec| spec.method)
            .collect();
        methods.sort();
        methods.dedup();
        methods
    }
}

impl SubscriptionManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_str(&data, format)?;
        debug!(
            "Loaded {} subscriber(s) from {}",
            manifest.subscribers.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Deserialize from string based on format
    pub fn from_str(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| ConfigError::deserialization("json", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| ConfigError::deserialization("yaml", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| ConfigError::deserialization("toml", e)),
        }
    }

    /// Serialize to string based on format
    pub fn to_string(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| ConfigError::serialization("json", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| ConfigError::serialization("yaml", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::serialization("toml", e)),
        }
    }
}
