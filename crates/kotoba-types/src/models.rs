use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marker substituted for message fields missing from the stored record.
pub const UNSET: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            other => Err(other.to_string()),
        }
    }
}

/// Directory profile stored under `users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Author of a message. Records written without a sender decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Student,
    Teacher,
    Unknown,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Unknown => UNSET,
        }
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("student") => Self::Student,
            Some("teacher") => Self::Teacher,
            _ => Self::Unknown,
        }
    }
}

impl From<Role> for Sender {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => Self::Student,
            Role::Teacher => Self::Teacher,
        }
    }
}

/// Identifier of the thread shared by one student and one teacher.
///
/// Always `{student_id}_{teacher_id}`; derived, never generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(student_id: &str, teacher_id: &str) -> Self {
        Self(format!("{}_{}", student_id, teacher_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved pairing: the thread plus both participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRef {
    pub thread_id: ThreadId,
    pub student_id: String,
    pub teacher_id: String,
}

impl ThreadRef {
    pub fn new(student_id: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        let student_id = student_id.into();
        let teacher_id = teacher_id.into();
        Self {
            thread_id: ThreadId::new(&student_id, &teacher_id),
            student_id,
            teacher_id,
        }
    }
}

/// The free-text fields of a diary entry as a student submits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiaryEntry {
    pub date: String,
    /// Vocabulary word of the day.
    pub term: String,
    /// Example sentence using the term.
    pub example: String,
    /// Kanji / script notation of the term.
    pub kanji: String,
    pub memo: String,
    pub language: String,
}

/// A record about to be appended to a thread.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub entry: DiaryEntry,
    pub sender: Sender,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A message as read back from a thread, with defaults already substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub date: String,
    pub term: String,
    pub example: String,
    pub kanji: String,
    pub memo: String,
    pub language: String,
    pub sender: Sender,
    pub created_at: String,
    pub advice: Option<String>,
    pub advice_original: Option<String>,
}

impl Message {
    /// Language code if one was recorded, `None` for missing or blank values.
    pub fn language_code(&self) -> Option<&str> {
        match self.language.as_str() {
            "" | UNSET => None,
            code => Some(code),
        }
    }
}
