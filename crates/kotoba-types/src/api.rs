use serde::{Deserialize, Serialize};

use crate::models::{DiaryEntry, Message, Role, ThreadId};

// -- Session claims --

/// JWT claims issued by the identity provider and checked by the REST
/// middleware and the event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

/// Email/password sign-in. Unknown emails are signed up on the fly, and
/// `name`/`role` seed the profile the first time only.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub token: String,
}

// -- Diary --

pub type SubmitDiaryRequest = DiaryEntry;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitAdviceRequest {
    pub advice: String,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    /// `false` when the advice text was empty and nothing was written.
    pub updated: bool,
    pub message: Option<Message>,
}

// -- Views --

#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    pub name: String,
    pub thread_id: ThreadId,
    pub entries: Vec<Message>,
}

/// A message as a teacher sees it: the original plus the memo rendered in
/// Japanese.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherEntry {
    #[serde(flatten)]
    pub message: Message,
    pub translated_memo: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherSection {
    pub student_id: String,
    pub student_name: String,
    pub thread_id: ThreadId,
    pub entries: Vec<TeacherEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherView {
    pub name: String,
    pub sections: Vec<TeacherSection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum View {
    Student(StudentView),
    Teacher(TeacherView),
}
