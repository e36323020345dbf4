// GET handlers: version, fridges, summaries, cycles, history

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;
use crate::models::{BatchTimestamp, FridgeId};
use crate::version::{NAME, VERSION};

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn no_fridge_data(fridge_id: FridgeId) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("no data for fridge {fridge_id}"),
    )
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

#[derive(Serialize)]
struct FridgeOverview {
    fridge_id: FridgeId,
    num_of_cycles: usize,
}

/// GET /api/fridges — known fridges in ascending id order.
pub(super) async fn fridges_handler(State(state): State<AppState>) -> impl IntoResponse {
    let fridges = state.fridges.read().await;
    let overview: Vec<FridgeOverview> = fridges
        .fridge_ids()
        .into_iter()
        .map(|fridge_id| FridgeOverview {
            fridge_id,
            num_of_cycles: fridges.num_cycles(fridge_id),
        })
        .collect();
    Json(overview)
}

/// GET /api/fridges/{id}/summary — 404 when the fridge has no data.
pub(super) async fn summary_handler(
    State(state): State<AppState>,
    Path(fridge_id): Path<FridgeId>,
) -> Response {
    let fridges = state.fridges.read().await;
    match fridges.summary(fridge_id) {
        Some(summary) => Json(summary).into_response(),
        None => no_fridge_data(fridge_id),
    }
}

/// GET /api/fridges/{id}/cycles — derived cycles in cycle-number order.
pub(super) async fn cycles_handler(
    State(state): State<AppState>,
    Path(fridge_id): Path<FridgeId>,
) -> Response {
    let fridges = state.fridges.read().await;
    match fridges.cycle_durations(fridge_id) {
        Some(cycles) => Json(cycles).into_response(),
        None => no_fridge_data(fridge_id),
    }
}

/// GET /api/cycles — the whole cycle store, keyed by fridge then cycle number.
pub(super) async fn cycle_store_handler(State(state): State<AppState>) -> impl IntoResponse {
    let fridges = state.fridges.read().await;
    Json(fridges.cycle_store().clone())
}

#[derive(Serialize)]
struct HistoryItem {
    timestamp: BatchTimestamp,
    raw_lines: usize,
    num_fridges: usize,
}

/// GET /api/history — one item per recorded batch, oldest first.
pub(super) async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    let fridges = state.fridges.read().await;
    let items: Vec<HistoryItem> = fridges
        .history()
        .iter()
        .map(|entry| HistoryItem {
            timestamp: entry.timestamp,
            raw_lines: entry.raw.len(),
            num_fridges: entry.snapshot.cycles.num_fridges(),
        })
        .collect();
    Json(items)
}

/// GET /api/history/{ts}/raw — raw lines of the batch stamped `ts` (RFC 3339).
pub(super) async fn raw_batch_handler(
    State(state): State<AppState>,
    Path(ts): Path<String>,
) -> Response {
    let timestamp = match DateTime::parse_from_rfc3339(&ts) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid timestamp {ts:?}: {e}"),
            );
        }
    };
    let fridges = state.fridges.read().await;
    match fridges.raw_batch(&timestamp) {
        Some(raw) => Json(raw).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("no batch at {ts}")),
    }
}
