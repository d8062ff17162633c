//! Monitored adapter snapshot types
//!
//! Adapters are owned by the external adapter-management subsystem; the
//! engine only ever sees read-only snapshots of them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire protocol family an adapter speaks to its external system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolType {
    /// HTTP/REST endpoints
    Http,
    /// Relational databases reached through a connection URL
    Database,
    /// Filesystem drop directories
    Filesystem,
    /// FTP servers
    Ftp,
    /// SFTP servers
    Sftp,
    /// Message brokers
    MessageQueue,
    /// SOAP services
    Soap,
    /// Anything without a dedicated check strategy
    Generic,
}

impl ProtocolType {
    /// Stable label used for metric tags and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolType::Http => "http",
            ProtocolType::Database => "database",
            ProtocolType::Filesystem => "filesystem",
            ProtocolType::Ftp => "ftp",
            ProtocolType::Sftp => "sftp",
            ProtocolType::MessageQueue => "message_queue",
            ProtocolType::Soap => "soap",
            ProtocolType::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of a configured adapter
///
/// The opaque `config` map carries protocol-specific settings (endpoint,
/// credentials, paths) as provided by the adapter-management subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoredAdapter {
    /// Adapter identifier
    pub id: String,
    /// Human-readable adapter name
    pub name: String,
    /// Protocol family
    pub protocol: ProtocolType,
    /// Whether the adapter is enabled for monitoring
    #[serde(default = "default_active")]
    pub active: bool,
    /// Opaque protocol-specific configuration
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
}

fn default_active() -> bool {
    true
}

impl MonitoredAdapter {
    /// Create an adapter snapshot with an empty configuration map
    pub fn new(id: impl Into<String>, name: impl Into<String>, protocol: ProtocolType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            protocol,
            active: true,
            config: HashMap::new(),
        }
    }

    /// Add a configuration entry, builder style
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// String configuration value
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(|v| v.as_str())
    }

    /// Integer configuration value, accepting numeric or string form
    pub fn config_u64(&self, key: &str) -> Option<u64> {
        self.config.get(key).and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.parse::<u64>().ok()))
        })
    }

    /// Boolean configuration value
    pub fn config_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accessors() {
        let adapter = MonitoredAdapter::new("orders-api", "Orders API", ProtocolType::Http)
            .with_config("endpoint", "https://orders.internal")
            .with_config("port", 8443)
            .with_config("retries", "5")
            .with_config("verifyTls", true);

        assert_eq!(adapter.config_str("endpoint"), Some("https://orders.internal"));
        assert_eq!(adapter.config_u64("port"), Some(8443));
        assert_eq!(adapter.config_u64("retries"), Some(5));
        assert_eq!(adapter.config_bool("verifyTls"), Some(true));
        assert_eq!(adapter.config_str("missing"), None);
    }

    #[test]
    fn test_protocol_labels() {
        assert_eq!(ProtocolType::MessageQueue.as_str(), "message_queue");
        assert_eq!(ProtocolType::Http.to_string(), "http");
    }

    #[test]
    fn test_active_defaults_on_deserialize() {
        let adapter: MonitoredAdapter = serde_yaml::from_str(
            "id: fs-drop\nname: Invoice Drop\nprotocol: filesystem\n",
        )
        .unwrap();
        assert!(adapter.active);
        assert!(adapter.config.is_empty());
    }
}
