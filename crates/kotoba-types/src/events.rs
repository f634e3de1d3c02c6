use serde::{Deserialize, Serialize};

use crate::models::{DiaryEntry, Message, ThreadId};

/// Inbound events. Every user action the service reacts to arrives as one of
/// these and is routed by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AppEvent {
    /// A user finished authenticating and wants their view
    SignedIn { user_id: String },

    /// A student submitted a diary entry
    DiarySubmitted { user_id: String, entry: DiaryEntry },

    /// A teacher attached advice to a message
    AdviceSubmitted {
        user_id: String,
        thread_id: ThreadId,
        message_id: String,
        advice: String,
    },
}

/// Outbound events pushed to live subscribers after a store write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DiaryEvent {
    /// A message was appended to a thread
    MessageCreated { thread_id: ThreadId, message: Message },

    /// Advice fields of a message were overwritten
    AdviceUpdated {
        thread_id: ThreadId,
        message_id: String,
        advice: String,
        advice_original: String,
    },
}

impl DiaryEvent {
    pub fn thread_id(&self) -> &ThreadId {
        match self {
            Self::MessageCreated { thread_id, .. } => thread_id,
            Self::AdviceUpdated { thread_id, .. } => thread_id,
        }
    }
}
