use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            access_code TEXT NOT NULL UNIQUE,
            is_active   INTEGER NOT NULL DEFAULT 1,
            avatar      TEXT,
            phone       TEXT,
            status      TEXT DEFAULT 'En ligne'
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            type        TEXT NOT NULL DEFAULT 'text',
            timestamp   TEXT NOT NULL,
            is_read     INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_messages_user
            ON messages(user_id);

        CREATE TABLE IF NOT EXISTS calls (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            caller_id   INTEGER NOT NULL REFERENCES users(id),
            receiver_id INTEGER NOT NULL REFERENCES users(id),
            type        TEXT NOT NULL,
            status      TEXT NOT NULL,
            duration    INTEGER NOT NULL DEFAULT 0,
            timestamp   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_calls_caller
            ON calls(caller_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_calls_receiver
            ON calls(receiver_id, timestamp);
        ",
    )?;

    info!("Store migrations complete");
    Ok(())
}
