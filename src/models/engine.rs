// Connection and server version descriptors for the traffic engine

use serde::{Deserialize, Serialize};

/// Where the engine's sync channel lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub server: String,
    pub sync_port: u16,
}

impl ConnectionInfo {
    pub fn describe(&self) -> String {
        format!("{}, Port {}", self.server, self.sync_port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
}

impl ServerVersion {
    pub fn describe(&self) -> String {
        format!(
            "{}, UUID: {}",
            self.version.as_deref().unwrap_or("N/A"),
            self.uuid.as_deref().unwrap_or("N/A")
        )
    }
}
