use crate::models::{CredentialRow, MessageRow, PairRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

const MESSAGE_COLUMNS: &str = "id, thread_id, date, term, example, kanji, memo, language, sender, created_at, advice, advice_original";

impl Database {
    // -- Credentials --

    /// Returns `false` when the email already has a credential; the existing
    /// row is left alone.
    pub fn create_credential(&self, id: &str, email: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let written = conn.execute(
                "INSERT INTO credentials (id, email, password) VALUES (?1, ?2, ?3)
                 ON CONFLICT(email) DO NOTHING",
                (id, email, password_hash),
            )?;
            Ok(written > 0)
        })
    }

    pub fn get_credential_by_email(&self, email: &str) -> Result<Option<CredentialRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, email, password FROM credentials WHERE email = ?1",
                [email],
                |row| {
                    Ok(CredentialRow {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password: row.get(2)?,
                    })
                },
            )
            .optional()
        })
    }

    // -- Users --

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, id))
    }

    /// Create the profile unless one already exists. Returns whether a row was
    /// written; an existing profile is never touched.
    pub fn insert_user_if_absent(&self, id: &str, email: &str, name: &str, role: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let written = conn.execute(
                "INSERT OR IGNORE INTO users (id, email, name, role) VALUES (?1, ?2, ?3, ?4)",
                (id, email, name, role),
            )?;
            Ok(written > 0)
        })
    }

    // -- Pairs --

    pub fn get_pair(&self, student_id: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT teacher_id FROM pairs WHERE student_id = ?1",
                [student_id],
                |row| row.get(0),
            )
            .optional()
        })
    }

    /// Students assigned to a teacher, ordered by student id.
    pub fn students_of(&self, teacher_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT student_id FROM pairs WHERE teacher_id = ?1 ORDER BY student_id",
            )?;
            let ids = stmt
                .query_map([teacher_id], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    /// Administrative edit: point a student at a teacher, replacing any
    /// previous assignment.
    pub fn assign_pair(&self, student_id: &str, teacher_id: &str) -> Result<()> {
        self.assign_pairs(&[PairRow {
            student_id: student_id.to_string(),
            teacher_id: teacher_id.to_string(),
        }])
    }

    /// Seed many pairings in one transaction.
    pub fn assign_pairs(&self, pairs: &[PairRow]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for pair in pairs {
                tx.execute(
                    "INSERT INTO pairs (student_id, teacher_id) VALUES (?1, ?2)
                     ON CONFLICT(student_id) DO UPDATE SET teacher_id = excluded.teacher_id",
                    (&pair.student_id, &pair.teacher_id),
                )?;
            }
            tx.commit()?;
            debug!("Assigned {} pairings", pairs.len());
            Ok(())
        })
    }

    // -- Messages --

    pub fn insert_message(&self, row: &MessageRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, thread_id, date, term, example, kanji, memo, language, sender, created_at, advice, advice_original)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                rusqlite::params![
                    row.id,
                    row.thread_id,
                    row.date,
                    row.term,
                    row.example,
                    row.kanji,
                    row.memo,
                    row.language,
                    row.sender,
                    row.created_at,
                    row.advice,
                    row.advice_original,
                ],
            )?;
            Ok(())
        })
    }

    /// Every message of a thread in insertion order.
    pub fn get_messages(&self, thread_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, thread_id))
    }

    pub fn get_message(&self, thread_id: &str, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM messages WHERE thread_id = ?1 AND id = ?2",
                MESSAGE_COLUMNS
            );
            conn.query_row(&sql, [thread_id, id], map_message).optional()
        })
    }

    /// Overwrite both advice columns of one message, leaving the rest of the
    /// record alone. Returns whether a message was updated.
    pub fn update_advice(
        &self,
        thread_id: &str,
        id: &str,
        advice: &str,
        advice_original: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE messages SET advice = ?3, advice_original = ?4 WHERE thread_id = ?1 AND id = ?2",
                (thread_id, id, advice, advice_original),
            )?;
            Ok(updated > 0)
        })
    }
}

fn query_user(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, email, name, role FROM users WHERE id = ?1")?;

    stmt.query_row([id], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: row.get(3)?,
        })
    })
    .optional()
}

fn query_messages(conn: &Connection, thread_id: &str) -> Result<Vec<MessageRow>> {
    let sql = format!(
        "SELECT {} FROM messages WHERE thread_id = ?1 ORDER BY seq ASC",
        MESSAGE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([thread_id], map_message)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        thread_id: row.get(1)?,
        date: row.get(2)?,
        term: row.get(3)?,
        example: row.get(4)?,
        kanji: row.get(5)?,
        memo: row.get(6)?,
        language: row.get(7)?,
        sender: row.get(8)?,
        created_at: row.get(9)?,
        advice: row.get(10)?,
        advice_original: row.get(11)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, thread_id: &str, memo: &str) -> MessageRow {
        MessageRow {
            id: id.to_string(),
            thread_id: thread_id.to_string(),
            memo: Some(memo.to_string()),
            language: Some("en".to_string()),
            sender: Some("student".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn messages_come_back_in_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        // Keys deliberately sort opposite to insertion order.
        db.insert_message(&message("c", "s_t", "first")).unwrap();
        db.insert_message(&message("b", "s_t", "second")).unwrap();
        db.insert_message(&message("a", "s_t", "third")).unwrap();
        db.insert_message(&message("z", "other_t", "elsewhere")).unwrap();

        let memos: Vec<_> = db
            .get_messages("s_t")
            .unwrap()
            .into_iter()
            .map(|m| m.memo.unwrap())
            .collect();
        assert_eq!(memos, vec!["first", "second", "third"]);
    }

    #[test]
    fn advice_update_touches_only_advice_columns() {
        let db = Database::open_in_memory().unwrap();
        db.insert_message(&message("m1", "s_t", "Hello")).unwrap();

        assert!(db.update_advice("s_t", "m1", "Nice", "良い").unwrap());
        assert!(!db.update_advice("s_t", "missing", "Nice", "良い").unwrap());

        let row = db.get_message("s_t", "m1").unwrap().unwrap();
        assert_eq!(row.memo.as_deref(), Some("Hello"));
        assert_eq!(row.advice.as_deref(), Some("Nice"));
        assert_eq!(row.advice_original.as_deref(), Some("良い"));
    }

    #[test]
    fn message_lookup_is_scoped_to_thread() {
        let db = Database::open_in_memory().unwrap();
        db.insert_message(&message("m1", "s_t", "Hello")).unwrap();
        assert!(db.get_message("x_t", "m1").unwrap().is_none());
    }

    #[test]
    fn reassigning_a_student_replaces_the_teacher() {
        let db = Database::open_in_memory().unwrap();
        db.assign_pair("s1", "t1").unwrap();
        db.assign_pair("s2", "t1").unwrap();
        db.assign_pair("s1", "t2").unwrap();

        assert_eq!(db.get_pair("s1").unwrap().as_deref(), Some("t2"));
        assert_eq!(db.students_of("t1").unwrap(), vec!["s2".to_string()]);
        assert!(db.get_pair("nobody").unwrap().is_none());
    }

    #[test]
    fn existing_profile_is_never_overwritten() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_user_if_absent("u1", "a@example.com", "Aiko", "student").unwrap());
        assert!(!db.insert_user_if_absent("u1", "a@example.com", "Other", "teacher").unwrap());

        let user = db.get_user("u1").unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("Aiko"));
        assert_eq!(user.role.as_deref(), Some("student"));
    }

    #[test]
    fn credentials_are_unique_per_email() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_credential("u1", "a@example.com", "hash").unwrap());
        assert!(!db.create_credential("u2", "a@example.com", "other").unwrap());
        assert_eq!(db.get_credential_by_email("a@example.com").unwrap().unwrap().id, "u1");
    }
}
