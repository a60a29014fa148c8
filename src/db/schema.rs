//! SQL DDL for the gallery tables.
//! SQLite-first design; can be adapted for other RDBMS.

/// Idempotent schema with:
/// - `admin`: single expected row, `username` UNIQUE
/// - `category`: `name` UNIQUE, insert-time `created_at`
/// - `design`: optional link to `category` with ON DELETE SET NULL, so
///   removing a category clears the link instead of cascading
/// - `featured` BOOLEAN (stored as INTEGER 0/1)
/// - timestamps as RFC3339 TEXT, defaulted by the database at insert time
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS admin (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS category (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE TABLE IF NOT EXISTS design (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    image_url TEXT NOT NULL,
    category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
    featured INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_design_category_id ON design(category_id);
"#;
