use tracing::{debug, info};

use crate::db::schema::{Question, User, Vote};
use crate::db::store::PollStore;
use crate::error::{PollError, PollResult};

/// Records `user`'s vote for `id_choice` on `question`, replacing any vote the
/// user already cast on it. A user never holds more than one vote per question.
pub async fn cast_vote<S: PollStore + ?Sized>(
    store: &S,
    user: Option<&User>,
    question: &Question,
    id_choice: i64,
) -> PollResult<Vote> {
    let user = user.ok_or(PollError::Unauthenticated)?;

    let choice = match store.choice(id_choice).await? {
        Some(v) if v.id_question == question.id => v,
        _ => {
            debug!(question = question.id, choice = id_choice, "Choice does not belong to question.");
            return Err(PollError::InvalidChoice);
        }
    };

    // The choice may disappear between the lookup and the write.
    let vote = store
        .upsert_vote(user.id, question.id, choice.id)
        .await?
        .ok_or(PollError::InvalidChoice)?;

    info!(
        question = question.id,
        choice = choice.id,
        user = %user.username,
        vote = vote.id,
        "Vote cast."
    );

    Ok(vote)
}

pub async fn find_vote<S: PollStore + ?Sized>(
    store: &S,
    user: &User,
    question: &Question,
) -> PollResult<Option<Vote>> {
    Ok(store.vote(user.id, question.id).await?)
}
