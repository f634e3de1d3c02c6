use tracing::debug;
use uuid::Uuid;

use kotoba_db::models::MessageRow;
use kotoba_types::models::{Message, NewMessage, Sender, ThreadId, UNSET};

use crate::context::Context;
use crate::error::DiaryError;

/// Append a message to a thread as one atomic insert. The key is a fresh
/// time-ordered id used only for addressing.
pub async fn append_message(ctx: &Context, thread_id: &ThreadId, message: NewMessage) -> Result<Message, DiaryError> {
    let row = encode(thread_id, Uuid::now_v7().to_string(), message);
    let stored = row.clone();

    ctx.with_store(move |store| store.append_message(&stored)).await?;

    debug!("Appended message {} to {}", row.id, thread_id);
    Ok(decode(row))
}

/// The whole thread, newest first.
pub async fn list_messages(ctx: &Context, thread_id: &ThreadId) -> Result<Vec<Message>, DiaryError> {
    let id = thread_id.as_str().to_string();
    let rows = ctx.with_store(move |store| store.list_messages(&id)).await?;

    Ok(rows.into_iter().rev().map(decode).collect())
}

fn encode(thread_id: &ThreadId, id: String, message: NewMessage) -> MessageRow {
    let entry = message.entry;
    MessageRow {
        id,
        thread_id: thread_id.as_str().to_string(),
        date: Some(entry.date),
        term: Some(entry.term),
        example: Some(entry.example),
        kanji: Some(entry.kanji),
        memo: Some(entry.memo),
        language: Some(entry.language),
        sender: Some(message.sender.as_str().to_string()),
        created_at: Some(message.created_at.to_rfc3339()),
        advice: None,
        advice_original: None,
    }
}

/// Apply the per-field defaults to a stored row. This is the only place
/// missing columns are filled in.
pub fn decode(row: MessageRow) -> Message {
    let or_unset = |value: Option<String>| value.unwrap_or_else(|| UNSET.to_string());

    Message {
        id: row.id,
        date: or_unset(row.date),
        term: or_unset(row.term),
        example: or_unset(row.example),
        kanji: or_unset(row.kanji),
        memo: or_unset(row.memo),
        language: or_unset(row.language),
        sender: Sender::parse(row.sender.as_deref()),
        created_at: or_unset(row.created_at),
        advice: row.advice,
        advice_original: row.advice_original,
    }
}
