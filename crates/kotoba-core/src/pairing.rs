use tracing::debug;

use kotoba_types::models::{Role, ThreadId, ThreadRef};

use crate::context::Context;
use crate::error::DiaryError;

/// Threads a user participates in.
///
/// A student has exactly one; a teacher has one per assigned student, sorted
/// by student id. No pairing at all is `NotFound`.
pub async fn resolve_threads(ctx: &Context, self_id: &str, role: Role) -> Result<Vec<ThreadRef>, DiaryError> {
    match role {
        Role::Student => Ok(vec![resolve_student_thread(ctx, self_id).await?]),
        Role::Teacher => resolve_teacher_threads(ctx, self_id).await,
    }
}

pub async fn resolve_student_thread(ctx: &Context, student_id: &str) -> Result<ThreadRef, DiaryError> {
    let id = student_id.to_string();
    let teacher_id = ctx
        .with_store(move |store| store.get_pair(&id))
        .await?
        .ok_or_else(|| DiaryError::not_found(format!("teacher assignment for {}", student_id)))?;

    Ok(ThreadRef::new(student_id, teacher_id))
}

pub async fn resolve_teacher_threads(ctx: &Context, teacher_id: &str) -> Result<Vec<ThreadRef>, DiaryError> {
    let id = teacher_id.to_string();
    let mut students = ctx.with_store(move |store| store.students_of(&id)).await?;

    if students.is_empty() {
        return Err(DiaryError::not_found(format!("students assigned to {}", teacher_id)));
    }

    students.sort();
    students.dedup();
    debug!("Teacher {} has {} students", teacher_id, students.len());

    Ok(students
        .into_iter()
        .map(|student_id| ThreadRef::new(student_id, teacher_id))
        .collect())
}

/// The caller's thread with the given id, `Forbidden` if they are not one of
/// its participants.
pub async fn find_thread(
    ctx: &Context,
    self_id: &str,
    role: Role,
    thread_id: &ThreadId,
) -> Result<ThreadRef, DiaryError> {
    let threads = match resolve_threads(ctx, self_id, role).await {
        Ok(threads) => threads,
        Err(DiaryError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    threads
        .into_iter()
        .find(|thread| &thread.thread_id == thread_id)
        .ok_or_else(|| DiaryError::Forbidden(format!("{} is not a participant of {}", self_id, thread_id)))
}
