use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use github::QueryError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::utils::TallyError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Too many requests")]
    RateLimited,

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Tally(#[from] TallyError),

    #[error(transparent)]
    Remote(#[from] QueryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, Json(json!({}))).into_response(),
            _ => {
                error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
