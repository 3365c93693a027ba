pub mod poll;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::handler::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/polls", get(poll::index))
        .route("/polls/", get(poll::index))
        .route("/polls/:id/", get(poll::detail))
        .route("/polls/:id/results/", get(poll::results))
        .route("/polls/:id/vote/", post(poll::vote))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::db::dbclient::DBClient;
    use crate::db::model;
    use crate::db::schema::{Choice, Question};

    async fn app() -> AppState {
        let db = DBClient::in_memory().await.unwrap();
        AppState::new(db, &Config::default())
    }

    async fn create_poll(state: &AppState, text: &str, start: Duration, end: Duration) -> (Question, Vec<Choice>) {
        let now = Utc::now();
        model::add_question(
            state.db_client.conn(),
            text,
            now + start,
            now + end,
            &["X".to_string(), "Y".to_string(), "Z".to_string()],
        ).await.unwrap()
    }

    async fn get(state: &AppState, uri: &str) -> Response {
        router(state.clone())
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get_as(state: &AppState, uri: &str, user: &str) -> Response {
        router(state.clone())
            .oneshot(Request::get(uri).header("x-remote-user", user).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_vote(state: &AppState, id: i64, user: Option<&str>, body: &str) -> Response {
        let mut req = Request::post(format!("/polls/{}/vote/", id))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(user) = user {
            req = req.header("x-remote-user", user);
        }

        router(state.clone())
            .oneshot(req.body(Body::from(body.to_owned())).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(resp: &Response) -> &str {
        resp.headers()[header::LOCATION].to_str().unwrap()
    }

    fn listed_texts(body: &Value) -> Vec<String> {
        body["latest_poll_list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["text"].as_str().unwrap().to_owned())
            .collect()
    }

    fn result_votes(body: &Value) -> Vec<i64> {
        body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["votes"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_no_polls() {
        let state = app().await;

        let resp = get(&state, "/polls/").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["message"], "No polls are available.");
        assert!(listed_texts(&body).is_empty());
    }

    #[tokio::test]
    async fn test_closed_poll_listed_but_not_votable() {
        let state = app().await;
        create_poll(&state, "Past poll.", -Duration::days(30), -Duration::days(10)).await;

        let body = json_body(get(&state, "/polls/").await).await;
        assert_eq!(listed_texts(&body), vec!["Past poll."]);
        assert_eq!(body["latest_poll_list"][0]["can_vote"], false);
        assert_eq!(body["latest_poll_list"][0]["state"], "closed");
        assert!(body["message"].is_null());
    }

    #[tokio::test]
    async fn test_future_poll_hidden_and_detail_redirects() {
        let state = app().await;
        let (future, _) = create_poll(&state, "Future poll.", Duration::days(30), Duration::days(40)).await;

        let body = json_body(get(&state, "/polls/").await).await;
        assert!(listed_texts(&body).is_empty());
        assert_eq!(body["message"], "No polls are available.");

        let resp = get(&state, &format!("/polls/{}/", future.id)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/polls/?error=not_published");

        let resp = get(&state, &format!("/polls/{}/results/", future.id)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let body = json_body(get(&state, "/polls/?error=not_published").await).await;
        assert_eq!(body["error_message"], "This poll is not yet published.");
    }

    #[tokio::test]
    async fn test_past_and_future_polls() {
        let state = app().await;
        create_poll(&state, "Past poll.", -Duration::days(30), -Duration::days(10)).await;
        create_poll(&state, "Future poll.", Duration::days(30), Duration::days(40)).await;

        let body = json_body(get(&state, "/polls/").await).await;
        assert_eq!(listed_texts(&body), vec!["Past poll."]);
    }

    #[tokio::test]
    async fn test_closed_poll_detail_redirects() {
        let state = app().await;
        let (past, _) = create_poll(&state, "Dummy 2", -Duration::days(15), -Duration::days(10)).await;

        let resp = get(&state, &format!("/polls/{}/", past.id)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/polls/?error=voting_closed");

        let resp = get(&state, &format!("/polls/{}/results/", past.id)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_poll_is_not_found() {
        let state = app().await;

        assert_eq!(get(&state, "/polls/42/").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(&state, "/polls/42/results/").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(post_vote(&state, 42, Some("alice"), "choice=1").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_vote_and_change_vote() {
        let state = app().await;
        model::add_user(state.db_client.conn(), "alice").await.unwrap();
        let (question, choices) = create_poll(&state, "Open poll.", -Duration::hours(1), Duration::hours(1)).await;

        let detail = json_body(get(&state, &format!("/polls/{}/", question.id)).await).await;
        assert_eq!(detail["question"]["text"], "Open poll.");
        assert_eq!(detail["choices"].as_array().unwrap().len(), 3);
        assert!(detail["selected_choice"].is_null());

        let resp = post_vote(&state, question.id, Some("alice"), &format!("choice={}", choices[0].id)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), format!("/polls/{}/results/", question.id));

        let body = json_body(get(&state, &format!("/polls/{}/results/", question.id)).await).await;
        assert_eq!(result_votes(&body), vec![1, 0, 0]);

        post_vote(&state, question.id, Some("alice"), &format!("choice={}", choices[1].id)).await;

        let body = json_body(get(&state, &format!("/polls/{}/results/", question.id)).await).await;
        assert_eq!(result_votes(&body), vec![0, 1, 0]);
        assert_eq!(body["results"][1]["label"], "1 vote");

        let detail = json_body(get_as(&state, &format!("/polls/{}/", question.id), "alice").await).await;
        assert_eq!(detail["selected_choice"], choices[1].id);
    }

    #[tokio::test]
    async fn test_vote_without_choice() {
        let state = app().await;
        model::add_user(state.db_client.conn(), "alice").await.unwrap();
        let (question, _) = create_poll(&state, "Open poll.", -Duration::hours(1), Duration::hours(1)).await;
        let (_, other_choices) = create_poll(&state, "Other poll.", -Duration::hours(1), Duration::hours(1)).await;

        let foreign = format!("choice={}", other_choices[0].id);
        for body in ["", "choice=", "choice=abc", foreign.as_str()] {
            let resp = post_vote(&state, question.id, Some("alice"), body).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let page = json_body(resp).await;
            assert_eq!(page["error_message"], "You didn't select a choice.");
            assert_eq!(page["question"]["id"], question.id);
        }

        let body = json_body(get(&state, &format!("/polls/{}/results/", question.id)).await).await;
        assert_eq!(result_votes(&body), vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_vote_requires_identity() {
        let state = app().await;
        let (question, choices) = create_poll(&state, "Open poll.", -Duration::hours(1), Duration::hours(1)).await;
        let body = format!("choice={}", choices[0].id);

        assert_eq!(post_vote(&state, question.id, None, &body).await.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(post_vote(&state, question.id, Some("nobody"), &body).await.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(post_vote(&state, question.id, Some("bad name"), &body).await.status(), StatusCode::UNAUTHORIZED);

        let results = json_body(get(&state, &format!("/polls/{}/results/", question.id)).await).await;
        assert_eq!(result_votes(&results), vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_vote_on_closed_poll_redirects() {
        let state = app().await;
        model::add_user(state.db_client.conn(), "alice").await.unwrap();
        let (question, choices) = create_poll(&state, "Closed poll.", -Duration::days(2), -Duration::days(1)).await;

        let resp = post_vote(&state, question.id, Some("alice"), &format!("choice={}", choices[0].id)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/polls/?error=voting_closed");

        let results = json_body(get(&state, &format!("/polls/{}/results/", question.id)).await).await;
        assert_eq!(result_votes(&results), vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_listing_capped() {
        let state = app().await;
        for i in 1..=6 {
            create_poll(&state, &format!("Poll {}.", i), -Duration::days(10 - i), Duration::days(1)).await;
        }

        let body = json_body(get(&state, "/polls").await).await;
        assert_eq!(listed_texts(&body), vec!["Poll 6.", "Poll 5.", "Poll 4.", "Poll 3.", "Poll 2."]);
    }

    #[tokio::test]
    async fn test_unknown_notice_ignored() {
        let state = app().await;

        let body = json_body(get(&state, "/polls/?error=whatever").await).await;
        assert!(body["error_message"].is_null());
    }
}
