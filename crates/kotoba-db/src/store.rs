use anyhow::Result;

use crate::Database;
use crate::models::{MessageRow, UserRow};

/// The directory namespace the diary operations read and write:
/// `users/{id}`, `pairs/{student}` and `chats/{thread}/messages/{key}`.
///
/// [`Database`] is the production implementation; tests wrap it to observe
/// writes.
pub trait DirectoryStore: Send + Sync {
    fn get_user(&self, id: &str) -> Result<Option<UserRow>>;

    fn insert_user_if_absent(&self, id: &str, email: &str, name: &str, role: &str) -> Result<bool>;

    fn get_pair(&self, student_id: &str) -> Result<Option<String>>;

    fn students_of(&self, teacher_id: &str) -> Result<Vec<String>>;

    /// Atomic create of a whole record.
    fn append_message(&self, row: &MessageRow) -> Result<()>;

    /// Full thread snapshot in insertion order.
    fn list_messages(&self, thread_id: &str) -> Result<Vec<MessageRow>>;

    fn get_message(&self, thread_id: &str, id: &str) -> Result<Option<MessageRow>>;

    /// Merge the two advice fields into an existing record.
    fn update_advice(&self, thread_id: &str, id: &str, advice: &str, advice_original: &str) -> Result<bool>;
}

impl DirectoryStore for Database {
    fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        Database::get_user(self, id)
    }

    fn insert_user_if_absent(&self, id: &str, email: &str, name: &str, role: &str) -> Result<bool> {
        Database::insert_user_if_absent(self, id, email, name, role)
    }

    fn get_pair(&self, student_id: &str) -> Result<Option<String>> {
        Database::get_pair(self, student_id)
    }

    fn students_of(&self, teacher_id: &str) -> Result<Vec<String>> {
        Database::students_of(self, teacher_id)
    }

    fn append_message(&self, row: &MessageRow) -> Result<()> {
        self.insert_message(row)
    }

    fn list_messages(&self, thread_id: &str) -> Result<Vec<MessageRow>> {
        self.get_messages(thread_id)
    }

    fn get_message(&self, thread_id: &str, id: &str) -> Result<Option<MessageRow>> {
        Database::get_message(self, thread_id, id)
    }

    fn update_advice(&self, thread_id: &str, id: &str, advice: &str, advice_original: &str) -> Result<bool> {
        Database::update_advice(self, thread_id, id, advice, advice_original)
    }
}
