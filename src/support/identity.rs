use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::db::schema::User;
use crate::db::store::PollStore;
use crate::error::PollError;
use crate::handler::AppState;

static VALIDATE_USERNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]{1,150}$").unwrap());

pub fn is_valid_username(username: &str) -> bool {
    VALIDATE_USERNAME.is_match(username)
}

/// The user named by the identity header, if it names a known user. The
/// header is set by whatever authenticates requests in front of this service.
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = PollError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let username = match parts.headers.get(&*state.identity_header) {
            None => return Ok(CurrentUser(None)),
            Some(v) => match v.to_str() {
                Ok(v) => v.trim(),
                Err(_) => return Ok(CurrentUser(None)),
            },
        };

        if !is_valid_username(username) {
            debug!(header = %state.identity_header, "Malformed username in identity header.");
            return Ok(CurrentUser(None));
        }

        let user = state.db_client.user(username).await?;
        if user.is_none() {
            debug!(username, "Identity header names an unknown user.");
        }

        Ok(CurrentUser(user))
    }
}
