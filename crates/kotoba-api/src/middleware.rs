use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::auth::AppState;
use crate::error::ApiError;

/// Validate the bearer token and attach the caller's
/// [`Identity`](kotoba_core::identity::Identity) to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::MissingToken)?;

    let identity = state.dispatcher.context().identity.verify(token)?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
