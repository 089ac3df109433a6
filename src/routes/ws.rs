// WebSocket stream of the global report

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::generator::ReportKind;
use crate::hub::{SharedHub, lock_hub};

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_global(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    let interval_ms = state.config.publishing.report_interval_ms;
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_global(socket, hub, interval_ms).await {
            tracing::info!("Global stats stream error: {}", e);
        }
    })
}

/// Serializes the current global report; the hub lock is released before returning.
fn global_report_json(hub: &SharedHub) -> anyhow::Result<String> {
    let hub = lock_hub(hub)?;
    let reports = hub.generator().generate(&[], ReportKind::Global);
    Ok(serde_json::to_string(&reports)?)
}

async fn stream_global(
    mut socket: WebSocket,
    hub: SharedHub,
    interval_ms: u64,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to global stats stream");
    let mut tick = tokio::time::interval(Duration::from_millis(interval_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let json = global_report_json(&hub)?;
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    tracing::info!("Client disconnected from global stats stream");
    Ok(())
}
