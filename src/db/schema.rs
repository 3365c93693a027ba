use chrono::{DateTime, Utc};
use serde::Serialize;

pub const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS poll_user (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT    NOT NULL UNIQUE
    );",
    "CREATE TABLE IF NOT EXISTS question (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        text       TEXT    NOT NULL,
        start_date TEXT    NOT NULL,
        end_date   TEXT    NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS choice (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        id_question INTEGER NOT NULL REFERENCES question (id) ON DELETE CASCADE,
        text        TEXT    NOT NULL,
        UNIQUE (id, id_question)
    );",
    "CREATE TABLE IF NOT EXISTS vote (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        id_user      INTEGER NOT NULL REFERENCES poll_user (id) ON DELETE CASCADE,
        id_question  INTEGER NOT NULL,
        id_choice    INTEGER NOT NULL,
        time_created TEXT    NOT NULL,
        FOREIGN KEY (id_choice, id_question) REFERENCES choice (id, id_question) ON DELETE CASCADE,
        UNIQUE (id_user, id_question)
    );",
    "CREATE INDEX IF NOT EXISTS vote_id_choice ON vote (id_choice);",
    "CREATE INDEX IF NOT EXISTS choice_id_question ON choice (id_question);",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: i64,
    pub id_question: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub id: i64,
    pub id_user: i64,
    pub id_question: i64,
    pub id_choice: i64,
    pub time_created: DateTime<Utc>,
}
