// Snapshot ingestion: newline-delimited JSON messages from the engine's async channel.
// Reading runs in its own task; each decoded message is applied to the shared hub.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::error::StatsError;
use crate::hub::{HubCounters, SharedHub, lock_hub};
use crate::models::{PortId, PortState};
use crate::stats::Snapshot;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotMessage {
    /// Engine-wide counters.
    Global { data: Snapshot },
    /// Version and UUID reported by the engine after connecting.
    ServerInfo {
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        uuid: Option<String>,
    },
    /// Counters for one port.
    Port { port_id: PortId, data: Snapshot },
    /// Host-side port attributes (ownership, state, loaded streams).
    PortInfo {
        port_id: PortId,
        #[serde(default)]
        owner: Option<String>,
        #[serde(default)]
        state: Option<PortState>,
        #[serde(default)]
        streams: Option<Vec<u32>>,
    },
    /// Entity became unreachable: drop its latest values (global when no port given).
    Invalidate {
        #[serde(default)]
        port_id: Option<PortId>,
    },
    /// Zero relative counters for the given ports (all when omitted) and the global entity.
    Clear {
        #[serde(default)]
        port_ids: Option<Vec<PortId>>,
    },
}

/// Decodes one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<SnapshotMessage>, StatsError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Spawns the task that reads messages from `source` until EOF or shutdown.
/// Malformed lines and rejected messages are logged and skipped.
pub fn spawn_reader<R>(
    source: R,
    hub: SharedHub,
    counters: Arc<HubCounters>,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(source).lines();
        loop {
            tokio::select! {
                result = lines.next_line() => {
                    match result {
                        Ok(Some(line)) => handle_line(&hub, &counters, &line),
                        Ok(None) => {
                            tracing::info!("snapshot source closed");
                            break;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, operation = "read_snapshot", "snapshot source read failed");
                            break;
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Snapshot reader shutting down");
                    break;
                }
            }
        }
    })
}

fn handle_line(hub: &SharedHub, counters: &HubCounters, line: &str) {
    let msg = match parse_line(line) {
        Ok(Some(msg)) => msg,
        Ok(None) => return,
        Err(e) => {
            counters.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, operation = "parse_snapshot", "skipping snapshot line");
            return;
        }
    };
    let result = match lock_hub(hub) {
        Ok(mut guard) => guard.apply(msg).map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => {
            counters.applied.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            counters.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, operation = "apply_snapshot", "snapshot rejected");
        }
    }
}
