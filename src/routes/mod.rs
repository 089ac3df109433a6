// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::hub::SharedHub;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) hub: SharedHub,
    pub(crate) config: AppConfig,
}

pub fn app(hub: SharedHub, config: AppConfig) -> Router {
    let state = AppState { hub, config };
    Router::new()
        .route("/", get(|| async { "portstats: traffic engine statistics" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/reports/{kind}", get(http::report_handler)) // GET /api/reports/g?ports=0,1
        .route("/api/reports/{kind}/text", get(http::report_text_handler)) // GET /api/reports/p/text
        .route("/api/clear", post(http::clear_handler)) // POST /api/clear?ports=0
        .route("/ws/global", get(ws::ws_global)) // WS /ws/global
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
