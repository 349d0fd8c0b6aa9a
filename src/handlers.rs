use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;
use std::sync::Arc;

use crate::store::StoreClient;
use crate::types::{ConfirmQuery, ErrorResp, ForwardResp, REQUIRED_FIELDS};

pub struct AppState {
    pub store: StoreClient,
}

fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

fn bad_request(message: String) -> (StatusCode, Json<ErrorResp>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResp { error: message }))
}

/// Broker handshake: acknowledge the confirmation token so the broker
/// starts delivering events. No side effects beyond logging.
pub async fn confirm(headers: HeaderMap, Query(query): Query<ConfirmQuery>) -> StatusCode {
    let request_id = request_id(&headers);
    let token = query
        .confirmation_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match token {
        Some(token) => {
            tracing::info!(%request_id, token, "broker confirmation token received");
            StatusCode::OK
        }
        None => {
            tracing::warn!(%request_id, "handshake request without confirmationToken");
            StatusCode::BAD_REQUEST
        }
    }
}

/// Unwrap a broker envelope. A record that lacks its own `timestamp` but
/// carries a `message` field is a wrapper around the real payload; a
/// record with a `timestamp` is already the payload and is left alone.
fn unwrap_envelope(record: Value) -> Value {
    match record {
        Value::Object(mut map) if !map.contains_key("timestamp") => match map.remove("message") {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

fn missing_required_field(map: &serde_json::Map<String, Value>) -> Option<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .find(|field| !map.contains_key(*field))
}

/// Telemetry delivery: parse, unwrap, validate, forward to the store.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ForwardResp>, (StatusCode, Json<ErrorResp>)> {
    let request_id = request_id(&headers);

    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(%request_id, error = %e, "rejecting unparseable delivery");
        bad_request(format!("invalid JSON body: {e}"))
    })?;

    let record = unwrap_envelope(raw);
    let Some(fields) = record.as_object() else {
        tracing::warn!(%request_id, "rejecting non-object record");
        return Err(bad_request("telemetry record must be a JSON object".into()));
    };
    if let Some(field) = missing_required_field(fields) {
        tracing::warn!(%request_id, field, "rejecting incomplete record");
        return Err(bad_request(format!("missing required field: {field}")));
    }

    let status = state.store.insert(&record).await.map_err(|e| {
        tracing::error!(%request_id, error = %e, "store insert failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResp {
                error: e.to_string(),
            }),
        )
    })?;

    tracing::info!(%request_id, supabase_status = status.as_u16(), "record forwarded");
    Ok(Json(ForwardResp {
        status: "ok",
        supabase_status: status.as_u16(),
    }))
}

pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
