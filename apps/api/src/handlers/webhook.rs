use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::dto::SubscriptionValidationResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Relays one Event Grid batch of directory audit events.
///
/// Answers with an empty 200 once every license call succeeded, or with the
/// validation code when the batch carried a subscription handshake.
pub async fn webhook_handler(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let outcome = state.relay_service.relay_batch(&body).await?;

    Ok(match outcome.validation_code {
        Some(validation_response) => Json(SubscriptionValidationResponse {
            validation_response,
        })
        .into_response(),
        None => StatusCode::OK.into_response(),
    })
}

#[cfg(test)]
mod tests;
