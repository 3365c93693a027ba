use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Question {0} does not exist.")]
    QuestionNotFound(i64),

    #[error("{}", NO_CHOICE_SELECTED)]
    InvalidChoice,

    #[error("Voting requires an identified user.")]
    Unauthenticated,

    #[error("A poll cannot end before it starts.")]
    InvalidWindow,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type PollResult<T> = Result<T, PollError>;

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let status = match &self {
            PollError::QuestionNotFound(_) => StatusCode::NOT_FOUND,
            PollError::InvalidChoice | PollError::InvalidWindow => StatusCode::BAD_REQUEST,
            PollError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PollError::Storage(e) => {
                error!(error = %e, "Storage error while handling request.");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({
                    "error": "An internal error occurred.",
                }))).into_response();
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
