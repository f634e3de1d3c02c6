use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Identity provider: sign-in credentials only
        CREATE TABLE IF NOT EXISTS credentials (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- users/{id}
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT,
            name        TEXT,
            role        TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- pairs/{student_id} -> teacher_id
        CREATE TABLE IF NOT EXISTS pairs (
            student_id  TEXT PRIMARY KEY,
            teacher_id  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pairs_teacher
            ON pairs(teacher_id);

        -- chats/{thread_id}/messages/{id}
        -- Record columns are nullable: rows written by older clients may
        -- lack any of them.
        CREATE TABLE IF NOT EXISTS messages (
            seq             INTEGER PRIMARY KEY AUTOINCREMENT,
            id              TEXT NOT NULL UNIQUE,
            thread_id       TEXT NOT NULL,
            date            TEXT,
            term            TEXT,
            example         TEXT,
            kanji           TEXT,
            memo            TEXT,
            language        TEXT,
            sender          TEXT,
            created_at      TEXT,
            advice          TEXT,
            advice_original TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_messages_thread
            ON messages(thread_id, seq);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
