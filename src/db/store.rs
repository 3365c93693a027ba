use async_trait::async_trait;

use crate::db::dbclient::DBClient;
use crate::db::model;
use crate::db::schema::{Choice, Question, User, Vote};

/// Storage operations the poll core is written against.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn user(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Every question, published or not.
    async fn questions(&self) -> anyhow::Result<Vec<Question>>;

    async fn question(&self, id: i64) -> anyhow::Result<Option<Question>>;

    /// Choices of a question in creation order.
    async fn choices(&self, id_question: i64) -> anyhow::Result<Vec<Choice>>;

    async fn choice(&self, id: i64) -> anyhow::Result<Option<Choice>>;

    async fn vote(&self, id_user: i64, id_question: i64) -> anyhow::Result<Option<Vote>>;

    /// Atomically creates or reassigns the single vote for `(id_user, id_question)`.
    async fn upsert_vote(
        &self,
        id_user: i64,
        id_question: i64,
        id_choice: i64,
    ) -> anyhow::Result<Option<Vote>>;

    async fn count_votes(&self, id_choice: i64) -> anyhow::Result<i64>;
}

#[async_trait]
impl PollStore for DBClient {
    async fn user(&self, username: &str) -> anyhow::Result<Option<User>> {
        model::get_user(self.conn(), username).await
    }

    async fn questions(&self) -> anyhow::Result<Vec<Question>> {
        model::list_questions(self.conn()).await
    }

    async fn question(&self, id: i64) -> anyhow::Result<Option<Question>> {
        model::get_question(self.conn(), id).await
    }

    async fn choices(&self, id_question: i64) -> anyhow::Result<Vec<Choice>> {
        model::list_choices(self.conn(), id_question).await
    }

    async fn choice(&self, id: i64) -> anyhow::Result<Option<Choice>> {
        model::get_choice(self.conn(), id).await
    }

    async fn vote(&self, id_user: i64, id_question: i64) -> anyhow::Result<Option<Vote>> {
        model::get_vote(self.conn(), id_user, id_question).await
    }

    async fn upsert_vote(
        &self,
        id_user: i64,
        id_question: i64,
        id_choice: i64,
    ) -> anyhow::Result<Option<Vote>> {
        model::upsert_vote(self.conn(), id_user, id_question, id_choice).await
    }

    async fn count_votes(&self, id_choice: i64) -> anyhow::Result<i64> {
        model::count_votes(self.conn(), id_choice).await
    }
}
