// GET/POST handlers: version, reports, clear

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use super::AppState;
use crate::error::StatsError;
use crate::hub::lock_hub;
use crate::models::{PortId, Reports, parse_port_list};

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

type HandlerError = (StatusCode, String);

#[derive(Debug, Deserialize)]
pub(super) struct PortsQuery {
    /// Comma-separated port ids; all configured ports when absent.
    ports: Option<String>,
}

impl PortsQuery {
    fn port_ids(&self) -> Result<Option<Vec<PortId>>, HandlerError> {
        self.ports
            .as_deref()
            .map(parse_port_list)
            .transpose()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}

fn internal(e: anyhow::Error) -> HandlerError {
    tracing::warn!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

fn build_reports(state: &AppState, kind: &str, query: &PortsQuery) -> Result<Reports, HandlerError> {
    let requested = query.port_ids()?;
    let hub = lock_hub(&state.hub).map_err(internal)?;
    let port_ids = requested.unwrap_or_else(|| hub.port_ids());
    Ok(hub.generator().generate_single_statistic(&port_ids, kind))
}

/// GET /api/reports/{kind}?ports=0,1: raw data and table per report name.
/// Unknown kinds return an empty object.
pub(super) async fn report_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<PortsQuery>,
) -> Result<Json<Reports>, HandlerError> {
    build_reports(&state, &kind, &query).map(Json)
}

/// GET /api/reports/{kind}/text: the same reports rendered as plain text tables.
pub(super) async fn report_text_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<PortsQuery>,
) -> Result<String, HandlerError> {
    let reports = build_reports(&state, &kind, &query)?;
    let mut out = String::new();
    for (name, report) in &reports {
        out.push_str(name);
        out.push('\n');
        out.push_str(&report.table.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// POST /api/clear?ports=0,1: re-baseline relative counters (all ports when absent).
pub(super) async fn clear_handler(
    State(state): State<AppState>,
    Query(query): Query<PortsQuery>,
) -> Result<StatusCode, HandlerError> {
    let port_ids = query.port_ids()?;
    let mut hub = lock_hub(&state.hub).map_err(internal)?;
    match hub.clear_stats(port_ids.as_deref()) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e @ StatsError::UnknownPort(_)) => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}
