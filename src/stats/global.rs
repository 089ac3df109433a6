// Engine-wide counters: CPU, aggregate bandwidth, stream and port totals

use std::time::Duration;

use super::format::format_num;
use super::{CounterStats, StatsStore};
use crate::models::{ConnectionInfo, FieldValue, Fields, PortMap, ServerVersion};

pub const GLOBAL_STATS_FIELDS: [&str; 8] = [
    "connection",
    "version",
    "cpu_util",
    "total_tx",
    "total_rx",
    "total_pps",
    "total_streams",
    "active_ports",
];

#[derive(Debug)]
pub struct GlobalStats {
    store: StatsStore,
    connection: ConnectionInfo,
    version: ServerVersion,
}

impl GlobalStats {
    pub fn new(connection: ConnectionInfo, version: ServerVersion) -> Self {
        Self {
            store: StatsStore::new(),
            connection,
            version,
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.store = StatsStore::with_window(window);
        self
    }

    pub fn connection(&self) -> &ConnectionInfo {
        &self.connection
    }

    pub fn server_version(&self) -> &ServerVersion {
        &self.version
    }

    pub fn set_server_version(&mut self, version: ServerVersion) {
        self.version = version;
    }

    /// Ordered global report. `ports` supplies stream and activity totals.
    pub fn generate_stats(&self, ports: &PortMap) -> Fields {
        let cpu_util = match self.get("m_cpu_util") {
            FieldValue::Number(n) => FieldValue::Text(format!("{}%", FieldValue::Number(n))),
            other => other,
        };
        let total_pps = match (
            self.store.get_absolute("m_tx_pps"),
            self.store.get_absolute("m_rx_pps"),
        ) {
            (Some(tx), Some(rx)) => FieldValue::Text(format_num(tx + rx, "pkt/sec")),
            _ => FieldValue::Unavailable,
        };
        let total_streams: usize = ports.values().map(|p| p.streams.len()).sum();
        let active_ports = ports.values().filter(|p| p.is_active()).count();

        Fields::new()
            .with("connection", self.connection.describe())
            .with("version", self.version.describe())
            .with("cpu_util", cpu_util)
            .with("total_tx", self.get_fmt("m_tx_bps", "b/sec"))
            .with("total_rx", self.get_fmt("m_rx_bps", "b/sec"))
            .with("total_pps", total_pps)
            .with("total_streams", total_streams)
            .with("active_ports", active_ports)
    }
}

impl CounterStats for GlobalStats {
    fn store(&self) -> &StatsStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut StatsStore {
        &mut self.store
    }
}
