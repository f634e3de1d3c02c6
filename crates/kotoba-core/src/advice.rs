use tracing::info;

use kotoba_translate::{DEFAULT_TARGET_LANG, translate};
use kotoba_types::models::{Message, ThreadId};

use crate::context::Context;
use crate::error::DiaryError;
use crate::relay::decode;

/// Language teachers write advice in.
pub const ADVICE_SOURCE_LANG: &str = "ja";

/// Attach teacher advice to a message, translated into the message's
/// language. Both the translation and the original text are merged into the
/// record; a second call overwrites the first.
///
/// Empty advice is a no-op and returns `None`.
pub async fn submit_advice(
    ctx: &Context,
    thread_id: &ThreadId,
    message_id: &str,
    advice_text: &str,
) -> Result<Option<Message>, DiaryError> {
    if advice_text.is_empty() {
        return Ok(None);
    }

    let (tid, mid) = (thread_id.as_str().to_string(), message_id.to_string());
    let mut message = ctx
        .with_store(move |store| store.get_message(&tid, &mid))
        .await?
        .map(decode)
        .ok_or_else(|| DiaryError::not_found(format!("message {} in {}", message_id, thread_id)))?;

    let target_lang = message.language_code().unwrap_or(DEFAULT_TARGET_LANG).to_string();
    let translated = translate(
        ctx.translator.as_ref(),
        advice_text,
        Some(ADVICE_SOURCE_LANG),
        &target_lang,
    )
    .await;

    let (tid, mid) = (thread_id.as_str().to_string(), message_id.to_string());
    let (advice, original) = (translated.clone(), advice_text.to_string());
    let updated = ctx
        .with_store(move |store| store.update_advice(&tid, &mid, &advice, &original))
        .await?;

    if !updated {
        return Err(DiaryError::not_found(format!("message {} in {}", message_id, thread_id)));
    }

    info!("Advice stored on {} ({} -> {})", message_id, ADVICE_SOURCE_LANG, target_lang);
    message.advice = Some(translated);
    message.advice_original = Some(advice_text.to_string());
    Ok(Some(message))
}
