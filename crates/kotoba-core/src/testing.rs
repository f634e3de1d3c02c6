//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kotoba_db::models::{MessageRow, UserRow};
use kotoba_db::{Database, DirectoryStore};
use kotoba_translate::{TranslateError, Translator};

use crate::context::Context;
use crate::identity::PasswordIdentity;

/// Store wrapper that counts writes.
pub struct CountingStore {
    inner: Arc<Database>,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl DirectoryStore for CountingStore {
    fn get_user(&self, id: &str) -> anyhow::Result<Option<UserRow>> {
        self.inner.get_user(id)
    }

    fn insert_user_if_absent(&self, id: &str, email: &str, name: &str, role: &str) -> anyhow::Result<bool> {
        self.wrote();
        self.inner.insert_user_if_absent(id, email, name, role)
    }

    fn get_pair(&self, student_id: &str) -> anyhow::Result<Option<String>> {
        self.inner.get_pair(student_id)
    }

    fn students_of(&self, teacher_id: &str) -> anyhow::Result<Vec<String>> {
        self.inner.students_of(teacher_id)
    }

    fn append_message(&self, row: &MessageRow) -> anyhow::Result<()> {
        self.wrote();
        self.inner.insert_message(row)
    }

    fn list_messages(&self, thread_id: &str) -> anyhow::Result<Vec<MessageRow>> {
        self.inner.get_messages(thread_id)
    }

    fn get_message(&self, thread_id: &str, id: &str) -> anyhow::Result<Option<MessageRow>> {
        self.inner.get_message(thread_id, id)
    }

    fn update_advice(&self, thread_id: &str, id: &str, advice: &str, advice_original: &str) -> anyhow::Result<bool> {
        self.wrote();
        self.inner.update_advice(thread_id, id, advice, advice_original)
    }
}

/// Translator stub: records every call and tags the text with the target
/// language.
#[derive(Default)]
pub struct RecordingTranslator {
    calls: Mutex<Vec<(String, String, String)>>,
}

impl RecordingTranslator {
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for RecordingTranslator {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source_lang.to_string(), target_lang.to_string()));
        Ok(format!("[{}] {}", target_lang, text))
    }
}

pub struct Fixture {
    pub db: Arc<Database>,
    pub store: Arc<CountingStore>,
    pub translator: Arc<RecordingTranslator>,
    pub ctx: Context,
}

impl Fixture {
    pub fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let store = Arc::new(CountingStore {
            inner: db.clone(),
            writes: AtomicUsize::new(0),
        });
        let translator = Arc::new(RecordingTranslator::default());
        let identity = Arc::new(PasswordIdentity::new(
            db.clone(),
            "test-secret",
            chrono::Duration::hours(1),
        ));
        let ctx = Context::new(store.clone(), translator.clone(), identity);
        Self {
            db,
            store,
            translator,
            ctx,
        }
    }

    /// Seed a student/teacher pair with profiles.
    pub fn pair(&self, student_id: &str, teacher_id: &str) {
        self.db
            .insert_user_if_absent(student_id, "s@example.com", &format!("Student {}", student_id), "student")
            .unwrap();
        self.db
            .insert_user_if_absent(teacher_id, "t@example.com", &format!("Teacher {}", teacher_id), "teacher")
            .unwrap();
        self.db.assign_pair(student_id, teacher_id).unwrap();
    }
}
