use std::sync::Arc;

use anyhow::anyhow;
use axum::{Json, extract::State, response::IntoResponse};
use tracing::{error, info};

use kotoba_core::profile::ensure_profile;
use kotoba_core::{DiaryError, Dispatcher};
use kotoba_types::api::{SignInRequest, SignInResponse};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub dispatcher: Dispatcher,
}

/// POST /auth/login: email/password sign-in, signing unknown emails up.
/// The profile is created from `name`/`role` on the first sign-in only.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() || req.role.is_none() {
        return Err(DiaryError::Invalid("name and role are required".into()).into());
    }

    let ctx = state.dispatcher.context().clone();

    // Password hashing and the credential lookup block
    let identity = ctx.identity.clone();
    let (email, password) = (req.email.clone(), req.password);
    let session = tokio::task::spawn_blocking(move || identity.sign_in(&email, &password))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            DiaryError::StoreUnavailable(anyhow!("sign-in task failed: {}", e))
        })??;

    let user = ensure_profile(&ctx, &session.identity, &req.name, req.role).await?;
    info!("{} signed in as {}", user.id, user.role);

    Ok(Json(SignInResponse {
        user_id: user.id,
        name: user.name,
        role: user.role,
        token: session.token,
    }))
}
