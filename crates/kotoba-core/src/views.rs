use tracing::info;

use kotoba_translate::{DEFAULT_TARGET_LANG, translate};
use kotoba_types::api::{StudentView, TeacherEntry, TeacherSection, TeacherView};
use kotoba_types::models::{Message, UNSET, User};

use crate::context::Context;
use crate::error::DiaryError;
use crate::pairing::{resolve_student_thread, resolve_teacher_threads};
use crate::profile::display_name;
use crate::relay::list_messages;

pub const DEFAULT_STUDENT_NAME: &str = "生徒";
pub const DEFAULT_TEACHER_NAME: &str = "講師";

/// A student's own thread, newest first. No teacher assignment is `NotFound`.
pub async fn student_view(ctx: &Context, user: &User) -> Result<StudentView, DiaryError> {
    let thread = resolve_student_thread(ctx, &user.id).await?;
    let entries = list_messages(ctx, &thread.thread_id).await?;

    Ok(StudentView {
        name: name_or(&user.name, DEFAULT_STUDENT_NAME),
        thread_id: thread.thread_id,
        entries,
    })
}

/// Every non-empty thread of a teacher's students. Foreign-language memos
/// are translated into Japanese on each call.
pub async fn teacher_view(ctx: &Context, user: &User) -> Result<TeacherView, DiaryError> {
    let name = name_or(&user.name, DEFAULT_TEACHER_NAME);

    let threads = match resolve_teacher_threads(ctx, &user.id).await {
        Ok(threads) => threads,
        Err(DiaryError::NotFound(what)) => {
            info!("No {}, showing an empty view", what);
            return Ok(TeacherView {
                name,
                sections: Vec::new(),
            });
        }
        Err(e) => return Err(e),
    };

    let mut sections = Vec::new();
    for thread in threads {
        let messages = list_messages(ctx, &thread.thread_id).await?;
        if messages.is_empty() {
            continue;
        }

        let student_name = display_name(ctx, &thread.student_id, DEFAULT_STUDENT_NAME).await?;

        let mut entries = Vec::with_capacity(messages.len());
        for message in messages {
            entries.push(teacher_entry(ctx, message).await);
        }

        sections.push(TeacherSection {
            student_id: thread.student_id,
            student_name,
            thread_id: thread.thread_id,
            entries,
        });
    }

    Ok(TeacherView { name, sections })
}

async fn teacher_entry(ctx: &Context, message: Message) -> TeacherEntry {
    let translated_memo = match message.language_code() {
        Some(lang) if lang != DEFAULT_TARGET_LANG && message.memo != UNSET => {
            translate(ctx.translator.as_ref(), &message.memo, Some(lang), DEFAULT_TARGET_LANG).await
        }
        _ => message.memo.clone(),
    };

    TeacherEntry {
        message,
        translated_memo,
    }
}

fn name_or(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
