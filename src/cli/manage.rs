use anyhow::bail;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::db::dbclient::DBClient;
use crate::db::model;
use crate::db::schema::{Question, User};
use crate::polls::{tally, window};
use crate::support::identity::is_valid_username;

pub const MIN_CHOICES: usize = 2;

pub async fn add_user(db: &DBClient, username: &str) -> anyhow::Result<User> {
    if !is_valid_username(username) {
        bail!("invalid username: {:?}", username);
    }

    if model::get_user(db.conn(), username).await?.is_some() {
        bail!("user {} already exists", username);
    }

    let user = model::add_user(db.conn(), username).await?;
    info!(user = user.id, username, "User added.");

    Ok(user)
}

pub async fn remove_user(db: &DBClient, username: &str) -> anyhow::Result<()> {
    if !model::remove_user(db.conn(), username).await? {
        bail!("user {} does not exist", username);
    }

    info!(username, "User removed.");
    Ok(())
}

pub async fn add_poll(
    db: &DBClient,
    text: &str,
    start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    choices: &[String],
) -> anyhow::Result<Question> {
    let text = text.trim();
    if text.is_empty() {
        bail!("poll text must not be empty");
    }

    let choices: Vec<String> = choices.iter().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()).collect();
    if choices.len() < MIN_CHOICES {
        bail!("a poll needs at least {} choices", MIN_CHOICES);
    }

    let start = start.unwrap_or_else(Utc::now);
    window::validate_window(start, end)?;

    let (question, choices) = model::add_question(db.conn(), text, start, end, &choices).await?;
    info!(question = question.id, choices = choices.len(), "Poll added.");

    Ok(question)
}

pub async fn remove_poll(db: &DBClient, id: i64) -> anyhow::Result<()> {
    if !model::remove_question(db.conn(), id).await? {
        bail!("poll {} does not exist", id);
    }

    info!(question = id, "Poll removed.");
    Ok(())
}

pub async fn list_polls(db: &DBClient) -> anyhow::Result<String> {
    let now = Utc::now();
    let questions = model::list_questions(db.conn()).await?;

    if questions.is_empty() {
        return Ok("No polls.\n".to_owned());
    }

    let mut out = String::new();

    for question in &questions {
        out.push_str(&format!(
            "#{} [{:?}] {} ({} to {})\n",
            question.id,
            question.state(now),
            question.text,
            question.start_date.to_rfc3339(),
            question.end_date.to_rfc3339(),
        ));

        for t in tally::results(db, question).await? {
            out.push_str(&format!("    {}: {}\n", t.choice.text, t.label));
        }
    }

    Ok(out)
}
