use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{query, Row, SqlitePool};
use tokio_stream::StreamExt;

use crate::db::schema::{Choice, Question, User, Vote};

fn user_from_row(r: SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: r.try_get("id")?,
        username: r.try_get("username")?,
    })
}

fn question_from_row(r: SqliteRow) -> Result<Question, sqlx::Error> {
    Ok(Question {
        id: r.try_get("id")?,
        text: r.try_get("text")?,
        start_date: r.try_get("start_date")?,
        end_date: r.try_get("end_date")?,
    })
}

fn choice_from_row(r: SqliteRow) -> Result<Choice, sqlx::Error> {
    Ok(Choice {
        id: r.try_get("id")?,
        id_question: r.try_get("id_question")?,
        text: r.try_get("text")?,
    })
}

fn vote_from_row(r: SqliteRow) -> Result<Vote, sqlx::Error> {
    Ok(Vote {
        id: r.try_get("id")?,
        id_user: r.try_get("id_user")?,
        id_question: r.try_get("id_question")?,
        id_choice: r.try_get("id_choice")?,
        time_created: r.try_get("time_created")?,
    })
}

pub async fn add_user(conn: &SqlitePool, username: &str) -> anyhow::Result<User> {
    let user = query("INSERT INTO poll_user (username) VALUES (?) RETURNING id, username;")
        .bind(username)
        .try_map(user_from_row)
        .fetch_one(conn)
        .await?;

    Ok(user)
}

pub async fn get_user(conn: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
    let user = query("SELECT id, username FROM poll_user WHERE username=?;")
        .bind(username)
        .try_map(user_from_row)
        .fetch_optional(conn)
        .await?;

    Ok(user)
}

pub async fn remove_user(conn: &SqlitePool, username: &str) -> anyhow::Result<bool> {
    let r = query("DELETE FROM poll_user WHERE username=?;")
        .bind(username)
        .execute(conn)
        .await?;

    Ok(r.rows_affected() > 0)
}

pub async fn list_questions(conn: &SqlitePool) -> anyhow::Result<Vec<Question>> {
    let mut stream = query("SELECT * FROM question ORDER BY start_date DESC, id DESC;")
        .try_map(question_from_row)
        .fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

pub async fn get_question(conn: &SqlitePool, id: i64) -> anyhow::Result<Option<Question>> {
    let r = query("SELECT * FROM question WHERE id=?;")
        .bind(id)
        .try_map(question_from_row)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

pub async fn add_question(
    conn: &SqlitePool,
    text: &str,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    choices: &[String],
) -> anyhow::Result<(Question, Vec<Choice>)> {
    let mut tx = conn.begin().await?;

    let question = query(
        "INSERT INTO question (text, start_date, end_date)
         VALUES (?, ?, ?)
         RETURNING id, text, start_date, end_date;")
        .bind(text)
        .bind(start_date)
        .bind(end_date)
        .try_map(question_from_row)
        .fetch_one(&mut *tx)
        .await?;

    let mut choice_result = Vec::new();

    for choice in choices {
        let choice_r = query(
            "INSERT INTO choice (id_question, text)
             VALUES (?, ?)
             RETURNING id, id_question, text;")
            .bind(question.id)
            .bind(choice.as_str())
            .try_map(choice_from_row)
            .fetch_one(&mut *tx)
            .await?;

        choice_result.push(choice_r);
    }

    tx.commit().await?;

    Ok((question, choice_result))
}

pub async fn remove_question(conn: &SqlitePool, id: i64) -> anyhow::Result<bool> {
    let r = query("DELETE FROM question WHERE id=?;")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(r.rows_affected() > 0)
}

pub async fn list_choices(conn: &SqlitePool, id_question: i64) -> anyhow::Result<Vec<Choice>> {
    let mut stream = query("SELECT * FROM choice WHERE id_question=? ORDER BY id;")
        .bind(id_question)
        .try_map(choice_from_row)
        .fetch(conn);

    let mut result = Vec::new();
    while let Some(row) = stream.try_next().await? {
        result.push(row);
    }

    Ok(result)
}

pub async fn get_choice(conn: &SqlitePool, id: i64) -> anyhow::Result<Option<Choice>> {
    let r = query("SELECT * FROM choice WHERE id=?;")
        .bind(id)
        .try_map(choice_from_row)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

pub async fn get_vote(
    conn: &SqlitePool,
    id_user: i64,
    id_question: i64,
) -> anyhow::Result<Option<Vote>> {
    let r = query("SELECT * FROM vote WHERE id_user=? AND id_question=?;")
        .bind(id_user)
        .bind(id_question)
        .try_map(vote_from_row)
        .fetch_optional(conn)
        .await?;

    Ok(r)
}

/// Inserts the user's vote for the question, or moves the existing one to
/// `id_choice`. Returns `None` without writing when the choice does not belong
/// to the question.
pub async fn upsert_vote(
    conn: &SqlitePool,
    id_user: i64,
    id_question: i64,
    id_choice: i64,
) -> anyhow::Result<Option<Vote>> {
    let mut tx = conn.begin().await?;

    // Single statement so the write lock is taken before anything is read.
    let vote = query(
        "INSERT INTO vote (id_user, id_question, id_choice, time_created)
         SELECT ?, c.id_question, c.id, ? FROM choice c WHERE c.id=? AND c.id_question=?
         ON CONFLICT (id_user, id_question) DO UPDATE SET id_choice=excluded.id_choice
         RETURNING id, id_user, id_question, id_choice, time_created;")
        .bind(id_user)
        .bind(Utc::now())
        .bind(id_choice)
        .bind(id_question)
        .try_map(vote_from_row)
        .fetch_optional(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(vote)
}

pub async fn count_votes(conn: &SqlitePool, id_choice: i64) -> anyhow::Result<i64> {
    let r = query("SELECT COUNT(*) AS votes FROM vote WHERE id_choice=?;")
        .bind(id_choice)
        .fetch_one(conn)
        .await?;

    Ok(r.try_get("votes")?)
}
