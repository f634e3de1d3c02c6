use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use kotoba_core::Outcome;
use kotoba_core::identity::Identity;
use kotoba_types::api::{AdviceResponse, SubmitAdviceRequest};
use kotoba_types::events::AppEvent;
use kotoba_types::models::ThreadId;

use crate::auth::AppState;
use crate::error::ApiError;

/// POST /threads/{thread_id}/messages/{message_id}/advice
pub async fn submit_advice(
    State(state): State<AppState>,
    Path((thread_id, message_id)): Path<(String, String)>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<SubmitAdviceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .dispatcher
        .dispatch(AppEvent::AdviceSubmitted {
            user_id: identity.user_id,
            thread_id: ThreadId::from(thread_id),
            message_id,
            advice: req.advice,
        })
        .await?;

    let message = match outcome {
        Outcome::Advice(message) => message,
        Outcome::View(_) => None,
    };

    Ok(Json(AdviceResponse {
        updated: message.is_some(),
        message,
    }))
}
