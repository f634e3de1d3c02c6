use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use kotoba_core::identity::Identity;
use kotoba_core::pairing::find_thread;
use kotoba_core::profile::load_user;
use kotoba_core::relay::list_messages;
use kotoba_types::api::SubmitDiaryRequest;
use kotoba_types::events::AppEvent;
use kotoba_types::models::ThreadId;

use crate::auth::AppState;
use crate::error::ApiError;

/// GET /me/view: the caller's student or teacher view.
pub async fn get_view(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .dispatcher
        .dispatch(AppEvent::SignedIn {
            user_id: identity.user_id,
        })
        .await?;

    Ok(Json(outcome))
}

/// POST /diary: append an entry to the caller's thread and return the
/// refreshed student view.
pub async fn submit_diary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(entry): Json<SubmitDiaryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .dispatcher
        .dispatch(AppEvent::DiarySubmitted {
            user_id: identity.user_id,
            entry,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /threads/{thread_id}/messages: a thread newest first, for its
/// participants only.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let ctx = state.dispatcher.context();
    let thread_id = ThreadId::from(thread_id);

    let user = load_user(ctx, &identity.user_id).await?;
    find_thread(ctx, &user.id, user.role, &thread_id).await?;

    let messages = list_messages(ctx, &thread_id).await?;
    Ok(Json(messages))
}
