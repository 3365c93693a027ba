use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::schema::{Choice, Question, User};
use crate::db::store::PollStore;
use crate::error::{PollError, PollResult, NO_CHOICE_SELECTED};
use crate::handler::AppState;
use crate::polls::gate::{self, ViewDecision, VoteDecision};
use crate::polls::tally::{self, Tally};
use crate::polls::window::PollState;
use crate::polls::{ledger, listing};
use crate::support::identity::CurrentUser;

pub const NO_POLLS: &str = "No polls are available.";

/// Reason a request was sent back to the listing, carried in `?error=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NotPublished,
    VotingClosed,
}

impl Notice {
    pub fn code(self) -> &'static str {
        match self {
            Notice::NotPublished => "not_published",
            Notice::VotingClosed => "voting_closed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "not_published" => Some(Notice::NotPublished),
            "voting_closed" => Some(Notice::VotingClosed),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::NotPublished => "This poll is not yet published.",
            Notice::VotingClosed => "Voting is closed for this poll.",
        }
    }

    fn redirect(self) -> Response {
        Redirect::to(&format!("/polls/?error={}", self.code())).into_response()
    }
}

#[derive(Serialize)]
pub struct PollSummary {
    pub id: i64,
    pub text: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub state: PollState,
    pub can_vote: bool,
    pub was_published_recently: bool,
}

impl PollSummary {
    fn new(question: &Question, now: DateTime<Utc>) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            start_date: question.start_date,
            end_date: question.end_date,
            state: question.state(now),
            can_vote: question.can_vote(now),
            was_published_recently: question.was_published_recently(now),
        }
    }
}

#[derive(Serialize)]
pub struct IndexPage {
    pub latest_poll_list: Vec<PollSummary>,
    pub message: Option<&'static str>,
    pub error_message: Option<&'static str>,
}

#[derive(Serialize)]
pub struct DetailPage {
    pub question: PollSummary,
    pub choices: Vec<Choice>,
    /// The requester's current vote, so a revote can start from it.
    pub selected_choice: Option<i64>,
    pub error_message: Option<&'static str>,
}

#[derive(Serialize)]
pub struct ResultsPage {
    pub question: PollSummary,
    pub results: Vec<Tally>,
}

#[derive(Deserialize)]
pub struct IndexParams {
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct VoteForm {
    choice: Option<String>,
}

async fn load_question(state: &AppState, id: i64) -> PollResult<Question> {
    state
        .db_client
        .question(id)
        .await?
        .ok_or(PollError::QuestionNotFound(id))
}

/// The detail document doubles as the voting form, so it is only served while
/// the poll is open.
fn voting_notice(question: &Question, now: DateTime<Utc>) -> Option<Notice> {
    if gate::authorize_view(question, now) == ViewDecision::DenyNotYetPublished {
        return Some(Notice::NotPublished);
    }

    match gate::authorize_vote(question, now) {
        VoteDecision::Allow => None,
        VoteDecision::DenyNotOpen => Some(Notice::VotingClosed),
    }
}

async fn detail_page(
    state: &AppState,
    question: &Question,
    user: Option<&User>,
    now: DateTime<Utc>,
    error_message: Option<&'static str>,
) -> PollResult<DetailPage> {
    let choices = state.db_client.choices(question.id).await?;

    let selected_choice = match user {
        None => None,
        Some(user) => ledger::find_vote(state.db_client.as_ref(), user, question)
            .await?
            .map(|v| v.id_choice),
    };

    Ok(DetailPage {
        question: PollSummary::new(question, now),
        choices,
        selected_choice,
        error_message,
    })
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> PollResult<Json<IndexPage>> {
    let now = Utc::now();
    let polls = listing::latest(state.db_client.as_ref(), now, state.index_limit).await?;

    let error_message = params
        .error
        .as_deref()
        .and_then(Notice::from_code)
        .map(Notice::message);

    Ok(Json(IndexPage {
        message: polls.is_empty().then_some(NO_POLLS),
        latest_poll_list: polls.iter().map(|q| PollSummary::new(q, now)).collect(),
        error_message,
    }))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> PollResult<Response> {
    let now = Utc::now();
    let question = load_question(&state, id).await?;

    if let Some(notice) = voting_notice(&question, now) {
        info!(question = question.id, notice = notice.code(), "Detail request redirected to listing.");
        return Ok(notice.redirect());
    }

    let page = detail_page(&state, &question, user.as_ref(), now, None).await?;

    Ok(Json(page).into_response())
}

pub async fn results(State(state): State<AppState>, Path(id): Path<i64>) -> PollResult<Response> {
    let now = Utc::now();
    let question = load_question(&state, id).await?;

    if gate::authorize_view(&question, now) == ViewDecision::DenyNotYetPublished {
        info!(question = question.id, "Results requested for unpublished poll.");
        return Ok(Notice::NotPublished.redirect());
    }

    let results = tally::results(state.db_client.as_ref(), &question).await?;

    Ok(Json(ResultsPage {
        question: PollSummary::new(&question, now),
        results,
    }).into_response())
}

pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<VoteForm>,
) -> PollResult<Response> {
    let now = Utc::now();
    let question = load_question(&state, id).await?;

    let user = match user {
        None => {
            info!(question = question.id, "Anonymous vote rejected.");
            return Err(PollError::Unauthenticated);
        }
        Some(v) => v,
    };

    if let Some(notice) = voting_notice(&question, now) {
        info!(question = question.id, user = %user.username, notice = notice.code(), "Vote outside voting window.");
        return Ok(notice.redirect());
    }

    //

    let id_choice = form.choice.as_deref().and_then(|v| v.trim().parse::<i64>().ok());

    let r = match id_choice {
        None => Err(PollError::InvalidChoice),
        Some(id_choice) => ledger::cast_vote(state.db_client.as_ref(), Some(&user), &question, id_choice).await,
    };

    match r {
        Ok(_) => Ok(Redirect::to(&format!("/polls/{}/results/", question.id)).into_response()),
        Err(PollError::InvalidChoice) => {
            info!(question = question.id, user = %user.username, "Vote submitted without a valid choice.");
            let page = detail_page(&state, &question, Some(&user), now, Some(NO_CHOICE_SELECTED)).await?;
            Ok(Json(page).into_response())
        }
        Err(e) => Err(e),
    }
}
