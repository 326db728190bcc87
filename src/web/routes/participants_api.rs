use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::models::ParticipantDto;
use crate::services::participant_service::{self, ParticipantError};
use crate::web::error::ApiError;
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct AddParticipantsResponse {
    pub message: String,
    pub range: String,
    pub inserted: Vec<ParticipantDto>,
}

pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParticipantDto>>, ApiError> {
    let rows = participant_service::list_participants(&state.pool).await?;
    Ok(Json(rows.into_iter().map(ParticipantDto::from).collect()))
}

pub async fn add_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AddParticipantsResponse>, ApiError> {
    let count = payload
        .ok()
        .and_then(|Json(body)| body.get("count").and_then(parse_count))
        .ok_or_else(|| {
            ParticipantError::InvalidArgument("count is missing or not an integer".to_string())
        })?;

    let outcome = participant_service::add_batch(&state.pool, count, state.max_batch).await?;
    Ok(Json(AddParticipantsResponse {
        message: format!("Successfully added {} participants", outcome.count()),
        range: outcome.range_label(),
        inserted: outcome.inserted.into_iter().map(ParticipantDto::from).collect(),
    }))
}

pub async fn toggle_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ParticipantDto>, ApiError> {
    // Nothing can be stored under a non-numeric id.
    let Ok(number) = id.trim().parse::<i64>() else {
        return Err(ParticipantError::NotFound(id).into());
    };
    let row = participant_service::toggle_status(&state.pool, number).await?;
    Ok(Json(row.into()))
}

/// Integral JSON numbers only; `3.0` counts as 3, `2.5` and non-numbers don't.
fn parse_count(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
