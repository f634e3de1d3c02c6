use std::collections::HashSet;
use std::convert::Infallible;

use axum::{
    Extension,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::Stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use kotoba_core::DiaryError;
use kotoba_core::identity::Identity;
use kotoba_core::pairing::resolve_threads;
use kotoba_core::profile::load_user;
use kotoba_types::models::ThreadId;

use crate::auth::AppState;
use crate::error::ApiError;

/// GET /events: server-sent stream of diary changes on the caller's
/// threads. Pairings are read once when the stream opens.
pub async fn stream_events(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let ctx = state.dispatcher.context();
    let user = load_user(ctx, &identity.user_id).await?;

    let threads: HashSet<ThreadId> = match resolve_threads(ctx, &user.id, user.role).await {
        Ok(threads) => threads.into_iter().map(|t| t.thread_id).collect(),
        Err(DiaryError::NotFound(_)) => HashSet::new(),
        Err(e) => return Err(e.into()),
    };
    debug!("{} subscribed to {} threads", user.id, threads.len());

    let mut rx = state.dispatcher.subscribe();
    let stream = async_stream::stream! {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(n)) => {
                    warn!("Event stream lagged by {} events", n);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if !threads.contains(event.thread_id()) {
                continue;
            }

            match Event::default().json_data(&event) {
                Ok(sse) => yield Ok::<Event, Infallible>(sse),
                Err(e) => warn!("Failed to encode diary event: {}", e),
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
