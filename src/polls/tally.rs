use futures::future::try_join_all;
use serde::Serialize;

use crate::db::schema::{Choice, Question};
use crate::db::store::PollStore;
use crate::error::PollResult;
use crate::support::numbers::votes_label;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub choice: Choice,
    pub votes: i64,
    pub label: String,
}

/// Counted from the ledger on every call, so it always reflects the latest
/// cast in the same request.
pub async fn vote_count<S: PollStore + ?Sized>(store: &S, choice: &Choice) -> PollResult<i64> {
    Ok(store.count_votes(choice.id).await?)
}

pub async fn results<S: PollStore + ?Sized>(store: &S, question: &Question) -> PollResult<Vec<Tally>> {
    let choices = store.choices(question.id).await?;

    let counts = try_join_all(choices.iter().map(|choice| vote_count(store, choice))).await?;

    Ok(choices
        .into_iter()
        .zip(counts)
        .map(|(choice, votes)| Tally {
            choice,
            votes,
            label: votes_label(votes),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::db::dbclient::DBClient;
    use crate::db::model;
    use crate::polls::ledger::cast_vote;

    #[tokio::test]
    async fn test_results_follow_votes() {
        let db = DBClient::in_memory().await.unwrap();
        let alice = model::add_user(db.conn(), "alice").await.unwrap();
        let bob = model::add_user(db.conn(), "bob").await.unwrap();
        let now = Utc::now();
        let (question, choices) = model::add_question(
            db.conn(),
            "Best editor?",
            now - Duration::hours(1),
            now + Duration::hours(1),
            &["vim".to_string(), "emacs".to_string(), "nano".to_string()],
        ).await.unwrap();

        let empty = results(&db, &question).await.unwrap();
        assert_eq!(empty.iter().map(|t| t.votes).collect::<Vec<_>>(), vec![0, 0, 0]);
        assert_eq!(empty[0].label, "0 votes");

        cast_vote(&db, Some(&alice), &question, choices[0].id).await.unwrap();
        cast_vote(&db, Some(&bob), &question, choices[0].id).await.unwrap();

        let tallies = results(&db, &question).await.unwrap();
        assert_eq!(tallies.iter().map(|t| t.choice.id).collect::<Vec<_>>(), choices.iter().map(|c| c.id).collect::<Vec<_>>());
        assert_eq!(tallies.iter().map(|t| t.votes).collect::<Vec<_>>(), vec![2, 0, 0]);
        assert_eq!(tallies[0].label, "2 votes");

        cast_vote(&db, Some(&bob), &question, choices[2].id).await.unwrap();

        let tallies = results(&db, &question).await.unwrap();
        assert_eq!(tallies.iter().map(|t| t.votes).collect::<Vec<_>>(), vec![1, 0, 1]);
        assert_eq!(tallies[2].label, "1 vote");
    }

    #[tokio::test]
    async fn test_results_without_choices() {
        let db = DBClient::in_memory().await.unwrap();
        let now = Utc::now();
        let (question, _) = model::add_question(db.conn(), "Empty?", now, now, &[]).await.unwrap();

        assert!(results(&db, &question).await.unwrap().is_empty());
    }
}
