use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id     TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            name        TEXT NOT NULL,
            picture     TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_sessions (
            session_token   TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(user_id),
            expires_at      TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_user
            ON user_sessions(user_id);

        CREATE TABLE IF NOT EXISTS valentines (
            valentine_id        TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL REFERENCES users(user_id),
            template_id         TEXT NOT NULL,
            from_name           TEXT NOT NULL,
            to_name             TEXT NOT NULL,
            message             TEXT NOT NULL,
            emoji_style         TEXT NOT NULL,
            background_theme    TEXT NOT NULL,
            unique_link         TEXT NOT NULL,
            payment_status      TEXT NOT NULL DEFAULT 'pending',
            payment_id          TEXT,
            response            TEXT,
            response_at         TEXT,
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_valentines_user
            ON valentines(user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
