//! SQL DDL for the directory service tables (SQLite).

/// Five tables mirroring the record kinds:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT everywhere
/// - `users.username`, `users.email`, `subscribers.email` UNIQUE; emails
///   compare case-insensitively
/// - `directory_entries.tags` is a JSON array serialized as text
/// - timestamps are RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL,
    user_type TEXT NOT NULL,
    country TEXT NOT NULL,
    genre TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subscribers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    image_url TEXT NOT NULL,
    category TEXT NOT NULL,
    date TEXT NOT NULL,
    download_link TEXT NULL,
    access_link TEXT NULL
);

CREATE TABLE IF NOT EXISTS directory_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    location TEXT NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]', -- JSON array
    initials TEXT NOT NULL,
    bg_color TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_directory_entries_type ON directory_entries(type);

CREATE TABLE IF NOT EXISTS contact_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    subject TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;
