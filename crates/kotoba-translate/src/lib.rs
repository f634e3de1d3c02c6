//! Best-effort machine translation for diary memos and teacher advice.
//!
//! The remote call sits behind [`Translator`]; callers go through
//! [`translate`], which never fails: on any error the input text is returned
//! unchanged and the failure is logged.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub use gemini::GeminiTranslator;

/// Language memos are translated into for teachers.
pub const DEFAULT_TARGET_LANG: &str = "ja";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("translation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("translation response had no candidate text")]
    MissingText,
}

/// One remote translation call. Implementations do no short-circuiting and
/// no fallback; that lives in [`translate`].
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError>;
}

/// Translate `text` from `source_lang` into `target_lang`.
///
/// Empty text or a missing source language returns the text as-is without a
/// remote call.
pub async fn translate(
    translator: &dyn Translator,
    text: &str,
    source_lang: Option<&str>,
    target_lang: &str,
) -> String {
    let source_lang = match source_lang {
        Some(lang) if !lang.is_empty() && !text.is_empty() => lang,
        _ => return text.to_string(),
    };

    match translator.translate_text(text, source_lang, target_lang).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Translation {} -> {} failed, keeping original: {}", source_lang, target_lang, e);
            text.to_string()
        }
    }
}

/// Instruction sent to the generative model.
pub fn build_prompt(text: &str, source_lang: &str, target_lang: &str) -> String {
    format!(
        "Translate the following sentence from {} to {}. Reply with the translation only, as a single sentence, without glosses or commentary.\n\nSentence: {}",
        source_lang, target_lang, text
    )
}
