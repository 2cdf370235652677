use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Schema, applied in order on every start. Every statement is idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('Admin', 'Employee')),
        phone TEXT,
        address TEXT,
        job_title TEXT NOT NULL,
        department TEXT NOT NULL DEFAULT 'General',
        salary INTEGER NOT NULL DEFAULT 0,
        join_date TEXT NOT NULL,
        is_verified INTEGER NOT NULL DEFAULT 0,
        verification_token TEXT,
        profile_pic TEXT,
        document TEXT
    )
    "#,
    // at most one admin account
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS users_single_admin
        ON users (role) WHERE role = 'Admin'
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (id),
        date TEXT NOT NULL,
        status TEXT NOT NULL,
        check_in TEXT,
        check_out TEXT,
        UNIQUE (user_id, date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leaves (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (id),
        leave_type TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        remarks TEXT,
        admin_remarks TEXT,
        status TEXT NOT NULL DEFAULT 'Pending'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender_id INTEGER NOT NULL REFERENCES users (id),
        sender_name TEXT NOT NULL,
        receiver_id INTEGER NOT NULL REFERENCES users (id),
        receiver_name TEXT NOT NULL,
        subject TEXT NOT NULL,
        body TEXT NOT NULL,
        date TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS messages_receiver ON messages (receiver_id)",
];

/// Opens the pool and brings the schema up to date.
///
/// In-memory databases live inside a single connection, so the pool is pinned
/// to one connection that is never recycled.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new().connect_with(options).await?
    };

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(statements = SCHEMA.len(), "Database schema ready");
    Ok(())
}
