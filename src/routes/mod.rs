// HTTP + WebSocket routes (read-only query surface)

mod http;
mod ws;

use axum::{Router, routing::get};
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::fridge_state::{FridgeUpdate, SharedFridgeState};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) fridges: SharedFridgeState,
    pub(crate) updates_tx: broadcast::Sender<FridgeUpdate>,
}

pub fn app(fridges: SharedFridgeState, updates_tx: broadcast::Sender<FridgeUpdate>) -> Router {
    let state = AppState {
        fridges,
        updates_tx,
    };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/fridges", get(http::fridges_handler)) // GET /api/fridges
        .route("/api/fridges/{id}/summary", get(http::summary_handler)) // GET /api/fridges/{id}/summary
        .route("/api/fridges/{id}/cycles", get(http::cycles_handler)) // GET /api/fridges/{id}/cycles
        .route("/api/cycles", get(http::cycle_store_handler)) // GET /api/cycles
        .route("/api/history", get(http::history_handler)) // GET /api/history
        .route("/api/history/{ts}/raw", get(http::raw_batch_handler)) // GET /api/history/{ts}/raw
        .route("/ws/updates", get(ws::ws_updates)) // WS /ws/updates
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
