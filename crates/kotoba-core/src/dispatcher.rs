use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use kotoba_types::api::{StudentView, View};
use kotoba_types::events::{AppEvent, DiaryEvent};
use kotoba_types::models::{DiaryEntry, Message, NewMessage, Role, Sender, ThreadId};

use crate::advice::submit_advice;
use crate::context::Context;
use crate::error::DiaryError;
use crate::pairing::{find_thread, resolve_student_thread};
use crate::profile::load_user;
use crate::relay::append_message;
use crate::views::{student_view, teacher_view};

/// Result of handling one [`AppEvent`]. Serializes as the bare payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    View(View),
    /// `None` when the advice text was empty and nothing was stored.
    Advice(Option<Message>),
}

/// Routes inbound events to their handlers and fans store changes out to
/// live subscribers.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    ctx: Context,

    /// Every subscriber receives every change; filtering by thread is the
    /// subscriber's job.
    broadcast_tx: broadcast::Sender<DiaryEvent>,
}

impl Dispatcher {
    pub fn new(ctx: Context) -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { ctx, broadcast_tx }),
        }
    }

    pub fn context(&self) -> &Context {
        &self.inner.ctx
    }

    /// Subscribe to diary changes. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<DiaryEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast a change to all subscribers.
    pub fn broadcast(&self, event: DiaryEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    pub async fn dispatch(&self, event: AppEvent) -> Result<Outcome, DiaryError> {
        match event {
            AppEvent::SignedIn { user_id } => self.on_signed_in(&user_id).await.map(Outcome::View),
            AppEvent::DiarySubmitted { user_id, entry } => self
                .on_diary_submitted(&user_id, entry)
                .await
                .map(|view| Outcome::View(View::Student(view))),
            AppEvent::AdviceSubmitted {
                user_id,
                thread_id,
                message_id,
                advice,
            } => self
                .on_advice_submitted(&user_id, &thread_id, &message_id, &advice)
                .await
                .map(Outcome::Advice),
        }
    }

    async fn on_signed_in(&self, user_id: &str) -> Result<View, DiaryError> {
        let ctx = &self.inner.ctx;
        let user = load_user(ctx, user_id).await?;
        debug!("Rendering {} view for {}", user.role, user.id);

        match user.role {
            Role::Student => student_view(ctx, &user).await.map(View::Student),
            Role::Teacher => teacher_view(ctx, &user).await.map(View::Teacher),
        }
    }

    async fn on_diary_submitted(
        &self,
        user_id: &str,
        entry: DiaryEntry,
    ) -> Result<StudentView, DiaryError> {
        let ctx = &self.inner.ctx;
        let user = load_user(ctx, user_id).await?;
        if user.role != Role::Student {
            return Err(DiaryError::Forbidden("only students write diary entries".into()));
        }
        if entry.language.trim().is_empty() {
            return Err(DiaryError::Invalid("language is required".into()));
        }

        let thread = resolve_student_thread(ctx, &user.id).await?;
        let message = append_message(
            ctx,
            &thread.thread_id,
            NewMessage {
                entry,
                sender: Sender::from(user.role),
                created_at: chrono::Utc::now(),
            },
        )
        .await?;

        info!("{} wrote {} in {}", user.id, message.id, thread.thread_id);
        self.broadcast(DiaryEvent::MessageCreated {
            thread_id: thread.thread_id,
            message,
        });

        student_view(ctx, &user).await
    }

    async fn on_advice_submitted(
        &self,
        user_id: &str,
        thread_id: &ThreadId,
        message_id: &str,
        advice: &str,
    ) -> Result<Option<Message>, DiaryError> {
        let ctx = &self.inner.ctx;
        let user = load_user(ctx, user_id).await?;
        if user.role != Role::Teacher {
            return Err(DiaryError::Forbidden("only teachers give advice".into()));
        }
        find_thread(ctx, &user.id, user.role, thread_id).await?;

        let updated = submit_advice(ctx, thread_id, message_id, advice).await?;
        if let Some(message) = &updated {
            self.broadcast(DiaryEvent::AdviceUpdated {
                thread_id: thread_id.clone(),
                message_id: message.id.clone(),
                advice: message.advice.clone().unwrap_or_default(),
                advice_original: message.advice_original.clone().unwrap_or_default(),
            });
        }

        Ok(updated)
    }
}
