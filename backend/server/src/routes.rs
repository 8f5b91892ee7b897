use std::{sync::Arc, time::Instant};

use axum::{
    Json,
    body::Bytes,
    extract,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::Value;
use tracing::info;

use crate::{
    error::AppError,
    feedback::record_feedback,
    models::{FeedbackRequest, FeedbackResponse, SPURIOUS_FIELD, is_spurious},
    state::State,
    utils::client_identifier,
};

pub async fn feedback_handler(
    extract::State(state): extract::State<Arc<State>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FeedbackResponse>, AppError> {
    let client = client_identifier(&headers, &state.config.client_ip_header);

    if !state.debouncer.admit(&client, Instant::now()) {
        info!("Too many requests from {client}, ignoring");
        return Err(AppError::RateLimited);
    }

    let mut payload: Value = serde_json::from_slice(&body)?;

    if is_spurious(&payload) {
        info!("Spurious comment, ignoring");
        return Ok(Json(FeedbackResponse::default()));
    }

    if let Some(fields) = payload.as_object_mut() {
        fields.remove(SPURIOUS_FIELD);
    }

    let request: FeedbackRequest = serde_json::from_value(payload)?;
    info!("Received: {request:?}");

    let url = record_feedback(
        state.api.as_ref(),
        &state.locks,
        &state.config.site_url,
        &request,
    )
    .await?;

    Ok(Json(FeedbackResponse { url }))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
