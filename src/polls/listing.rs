use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::db::schema::Question;
use crate::db::store::PollStore;
use crate::error::PollResult;

/// Published questions, newest start first. `limit` of `None` returns all.
pub async fn latest<S: PollStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> PollResult<Vec<Question>> {
    let questions = store.questions().await?;

    let published = questions
        .into_iter()
        .filter(|q| q.is_published(now))
        .sorted_by_key(|q| std::cmp::Reverse((q.start_date, q.id)));

    Ok(match limit {
        None => published.collect(),
        Some(n) => published.take(n).collect(),
    })
}
