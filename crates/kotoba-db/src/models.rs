//! Database row types: these map directly to SQLite rows.
//! Distinct from kotoba-types models: optional columns stay optional here and
//! defaults are applied by the caller.

pub struct CredentialRow {
    pub id: String,
    pub email: String,
    pub password: String,
}

pub struct UserRow {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

pub struct PairRow {
    pub student_id: String,
    pub teacher_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageRow {
    pub id: String,
    pub thread_id: String,
    pub date: Option<String>,
    pub term: Option<String>,
    pub example: Option<String>,
    pub kanji: Option<String>,
    pub memo: Option<String>,
    pub language: Option<String>,
    pub sender: Option<String>,
    pub created_at: Option<String>,
    pub advice: Option<String>,
    pub advice_original: Option<String>,
}
