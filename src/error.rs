// Errors at the edges of the stats core (ingestion and request parsing).
// Report generation itself never fails; missing values render as "N/A".

use crate::models::PortId;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("unknown port {0}")]
    UnknownPort(PortId),

    #[error("unknown report kind {0:?}")]
    UnknownReportKind(String),

    #[error("unknown port state {0:?}")]
    UnknownPortState(String),

    #[error("invalid port list {0:?}")]
    InvalidPortList(String),

    #[error("malformed snapshot message: {0}")]
    Decode(#[from] serde_json::Error),
}
