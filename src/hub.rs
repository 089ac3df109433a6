// Owner of the global entity and the port collection.
// Ingestion, the staleness worker and HTTP handlers share it behind one mutex,
// so a snapshot and its baseline are always replaced together.

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::error::StatsError;
use crate::generator::{DEFAULT_MAX_DISPLAY_PORTS, StatsGenerator};
use crate::ingest::SnapshotMessage;
use crate::models::{Port, PortId, PortMap, ServerVersion};
use crate::stats::{CounterStats, GlobalStats, PortStats, StatsStore};

pub type SharedHub = Arc<Mutex<StatsHub>>;

pub fn lock_hub(hub: &SharedHub) -> anyhow::Result<MutexGuard<'_, StatsHub>> {
    hub.lock()
        .map_err(|e| anyhow::anyhow!("stats hub lock poisoned: {}", e))
}

/// Running totals for the periodic "app stats" log line.
#[derive(Debug, Default)]
pub struct HubCounters {
    pub applied: AtomicU64,
    pub rejected: AtomicU64,
    pub invalidated: AtomicU64,
}

#[derive(Debug)]
pub struct StatsHub {
    global: GlobalStats,
    ports: PortMap,
    max_display_ports: usize,
}

impl StatsHub {
    pub fn new(global: GlobalStats, ports: PortMap) -> Self {
        Self {
            global,
            ports,
            max_display_ports: DEFAULT_MAX_DISPLAY_PORTS,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let window = config.stats.reference_window();
        let global = GlobalStats::new(
            config.engine.connection_info(),
            config.engine.server_version(),
        )
        .with_window(window);
        let ports = config
            .ports
            .iter()
            .map(|pc| {
                let mut port = Port::new(pc.id, pc.driver.clone(), pc.speed_gbps);
                port.owner = pc.owner.clone();
                port.stats = PortStats::with_window(window);
                (pc.id, port)
            })
            .collect();
        let mut hub = Self::new(global, ports);
        hub.max_display_ports = config.stats.max_display_ports;
        hub
    }

    pub fn shared(self) -> SharedHub {
        Arc::new(Mutex::new(self))
    }

    pub fn global(&self) -> &GlobalStats {
        &self.global
    }

    pub fn ports(&self) -> &PortMap {
        &self.ports
    }

    pub fn port_ids(&self) -> Vec<PortId> {
        self.ports.keys().copied().collect()
    }

    pub fn port_mut(&mut self, id: PortId) -> Result<&mut Port, StatsError> {
        self.ports.get_mut(&id).ok_or(StatsError::UnknownPort(id))
    }

    pub fn max_display_ports(&self) -> usize {
        self.max_display_ports
    }

    pub fn generator(&self) -> StatsGenerator<'_> {
        StatsGenerator::new(&self.global, &self.ports).with_max_display_ports(self.max_display_ports)
    }

    pub fn apply(&mut self, msg: SnapshotMessage) -> Result<(), StatsError> {
        match msg {
            SnapshotMessage::Global { data } => self.global.update(data),
            SnapshotMessage::ServerInfo { version, uuid } => {
                self.global.set_server_version(ServerVersion { version, uuid });
            }
            SnapshotMessage::Port { port_id, data } => self.port_mut(port_id)?.stats.update(data),
            SnapshotMessage::PortInfo {
                port_id,
                owner,
                state,
                streams,
            } => {
                let port = self.port_mut(port_id)?;
                if let Some(owner) = owner {
                    port.owner = owner;
                }
                if let Some(state) = state {
                    port.state = state;
                }
                if let Some(streams) = streams {
                    port.streams = streams;
                }
            }
            SnapshotMessage::Invalidate { port_id: None } => self.global.invalidate(),
            SnapshotMessage::Invalidate {
                port_id: Some(port_id),
            } => self.port_mut(port_id)?.stats.invalidate(),
            SnapshotMessage::Clear { port_ids } => self.clear_stats(port_ids.as_deref())?,
        }
        Ok(())
    }

    /// Re-baselines the global entity and the given ports (all ports when `None`).
    pub fn clear_stats(&mut self, port_ids: Option<&[PortId]>) -> Result<(), StatsError> {
        if let Some(ids) = port_ids
            && let Some(missing) = ids.iter().find(|id| !self.ports.contains_key(*id))
        {
            return Err(StatsError::UnknownPort(*missing));
        }
        self.global.clear_stats();
        for port in self.ports.values_mut() {
            if port_ids.is_none_or(|ids| ids.contains(&port.id)) {
                port.stats.clear_stats();
            }
        }
        tracing::debug!(ports = ?port_ids, "stats cleared");
        Ok(())
    }

    /// Invalidates every entity holding values older than `max_age`. Returns how many.
    pub fn invalidate_stale(&mut self, now: Instant, max_age: Duration) -> usize {
        fn is_stale(store: &StatsStore, now: Instant, max_age: Duration) -> bool {
            !store.latest().is_empty() && now.saturating_duration_since(store.last_update()) > max_age
        }

        let mut count = 0;
        if is_stale(self.global.store(), now, max_age) {
            self.global.invalidate();
            tracing::debug!(entity = "global", "stale stats invalidated");
            count += 1;
        }
        for port in self.ports.values_mut() {
            if is_stale(port.stats.store(), now, max_age) {
                port.stats.invalidate();
                tracing::debug!(entity = "port", port_id = port.id, "stale stats invalidated");
                count += 1;
            }
        }
        count
    }
}
