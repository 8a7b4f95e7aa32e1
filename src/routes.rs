use std::{collections::HashMap, sync::Arc};

use axum::{
    Form, Json,
    extract::State as AxumState,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    error::AppError,
    quiz::{self, Step, Submission, View},
    scenarios::{self, SCENARIOS, Scenario, TOTAL_SCENARIOS},
    session::{SESSION_COOKIE, SessionState},
    state::State,
};

#[derive(Deserialize)]
pub struct DecisionForm {
    decision: String,
}

/// `GET /`: current scenario, or the summary once the quiz is done.
/// First visit (or a stale cookie) lazily starts a fresh session.
pub async fn index_handler(
    AxumState(state): AxumState<Arc<State>>,
    jar: CookieJar,
) -> Response {
    let (session, jar) = match load_session(&state, &jar).await {
        Some(session) => (session, jar),
        None => fresh_session(&state, jar).await,
    };

    let body = match quiz::view(&session) {
        View::Current { scenario, index } => scenario_payload(scenario, index),
        View::Summary { decisions } => summary_payload(decisions),
    };

    (jar, Json(body)).into_response()
}

/// `POST /decision`: records the answer for the current scenario.
///
/// Responds with the tally variant when the vote reached the store,
/// otherwise with the next scenario or the completion signal.
pub async fn decision_handler(
    AxumState(state): AxumState<Arc<State>>,
    jar: CookieJar,
    Form(form): Form<DecisionForm>,
) -> Result<Json<Value>, AppError> {
    let id = session_id(&jar).ok_or(AppError::SessionExpired)?;
    let mut session = state
        .sessions
        .load(id)
        .await
        .ok_or(AppError::SessionExpired)?;

    let submission = quiz::submit_decision(&mut session, &state.votes, &form.decision).await?;
    state.sessions.save(id, session).await;

    Ok(Json(match submission {
        Submission::Tally {
            scenario_id,
            decision,
            tally,
        } => json!({
            "show_results": true,
            "scenario_id": scenario_id,
            "your_decision": decision,
            "yes_votes": tally.yes_count,
            "no_votes": tally.no_count,
            "next_scenario_url": "/next_scenario",
        }),
        Submission::Advanced(step) => step_payload(step),
    }))
}

/// `GET /next_scenario`: explicit advance after a tally display.
pub async fn next_scenario_handler(
    AxumState(state): AxumState<Arc<State>>,
    jar: CookieJar,
) -> Result<Json<Value>, AppError> {
    let id = session_id(&jar).ok_or(AppError::SessionExpired)?;
    let mut session = state
        .sessions
        .load(id)
        .await
        .ok_or(AppError::SessionExpired)?;

    let step = quiz::advance(&mut session)?;
    state.sessions.save(id, session).await;

    Ok(Json(step_payload(step)))
}

/// `GET /reset`: throws the session away and starts over.
pub async fn reset_handler(
    AxumState(state): AxumState<Arc<State>>,
    jar: CookieJar,
) -> Response {
    let jar = match session_id(&jar) {
        Some(id) => {
            state.sessions.remove(id).await;
            jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
        }
        None => jar,
    };

    (jar, Redirect::to("/")).into_response()
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

async fn load_session(state: &State, jar: &CookieJar) -> Option<SessionState> {
    state.sessions.load(session_id(jar)?).await
}

async fn fresh_session(state: &State, jar: CookieJar) -> (SessionState, CookieJar) {
    let id = Uuid::new_v4();
    let session = SessionState::new();

    state.sessions.save(id, session.clone()).await;

    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    (session, jar.add(cookie))
}

fn scenario_payload(scenario: &'static Scenario, index: usize) -> Value {
    json!({
        "is_complete": false,
        "scenario": scenario,
        "progress": quiz::progress(index) * 100.0,
        "current_scenario_number": index + 1,
        "total_scenarios": TOTAL_SCENARIOS,
        "emoji": scenarios::emoji_for(scenario.image_key),
    })
}

fn summary_payload(decisions: &HashMap<String, bool>) -> Value {
    let items: Vec<Value> = SCENARIOS
        .iter()
        .map(|scenario| {
            json!({
                "id": scenario.id,
                "title": scenario.title,
                "scenario": scenario.prompt,
                "image": scenario.image_key,
                "emoji": scenarios::emoji_for(scenario.image_key),
                "decision": decisions.get(&scenario.id.to_string()),
            })
        })
        .collect();

    json!({
        "is_complete": true,
        "scenarios": items,
        "decisions": decisions,
    })
}

fn step_payload(step: Step) -> Value {
    match step {
        Step::Next { scenario, index } => scenario_payload(scenario, index),
        Step::Complete => json!({ "is_complete": true, "summary_url": "/" }),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{
            Request, StatusCode,
            header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        },
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, router, session::SessionStore, votes::RemoteVoteStore};

    fn test_state() -> Arc<State> {
        Arc::new(State {
            config: Config {
                port: 0,
                vote_store: None,
            },
            sessions: SessionStore::default(),
            votes: RemoteVoteStore::new(None),
        })
    }

    fn decision_request(cookie: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/decision")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }

        builder.body(Body::from("decision=yes")).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_starts_fresh_session() {
        let response = router(test_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with(SESSION_COOKIE));

        let body = body_json(response).await;
        assert_eq!(body["is_complete"], false);
        assert_eq!(body["scenario"]["id"], 1);
        assert_eq!(body["progress"], 0.0);
    }

    #[tokio::test]
    async fn test_decision_without_cookie_expires() {
        let response = router(test_state())
            .oneshot(decision_request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Session expired");
        assert_eq!(body["redirect"], "/");
    }

    #[tokio::test]
    async fn test_decision_with_unknown_cookie_expires() {
        let state = test_state();
        let id = Uuid::new_v4();

        let response = router(state.clone())
            .oneshot(decision_request(Some(format!("{SESSION_COOKIE}={id}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Session expired");
        assert_eq!(body["redirect"], "/");

        // the expired session must not be recreated behind the user's back
        assert!(state.sessions.load(id).await.is_none());
    }

    #[tokio::test]
    async fn test_next_scenario_without_session_expires() {
        let response = router(test_state())
            .oneshot(
                Request::builder()
                    .uri("/next_scenario")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Session expired");
        assert_eq!(body["redirect"], "/");
    }

    #[tokio::test]
    async fn test_reset_clears_session() {
        let state = test_state();
        let id = Uuid::new_v4();

        let mut session = SessionState::new();
        session.position = 9;
        session.decisions.insert("1".to_string(), true);
        state.sessions.save(id, session).await;

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/reset")
                    .header(COOKIE, format!("{SESSION_COOKIE}={id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/");

        // store entry gone, cookie sent back for removal
        assert!(state.sessions.load(id).await.is_none());
        assert!(response.headers().get(SET_COOKIE).is_some());
    }

    #[test]
    fn test_scenario_payload_shape() {
        let payload = scenario_payload(&SCENARIOS[0], 0);

        assert_eq!(payload["is_complete"], false);
        assert_eq!(payload["progress"], 0.0);
        assert_eq!(payload["current_scenario_number"], 1);
        assert_eq!(payload["total_scenarios"], 17);
        assert_eq!(payload["scenario"]["id"], 1);
        assert_eq!(payload["scenario"]["image"], "skateboard");
        assert_eq!(payload["emoji"], "🛹");
    }

    #[test]
    fn test_summary_payload_pairs_decisions() {
        let mut decisions = HashMap::new();
        decisions.insert("1".to_string(), true);
        decisions.insert("2".to_string(), false);

        let payload = summary_payload(&decisions);
        let items = payload["scenarios"].as_array().unwrap();

        assert_eq!(payload["is_complete"], true);
        assert_eq!(items.len(), TOTAL_SCENARIOS);
        assert_eq!(items[0]["decision"], true);
        assert_eq!(items[1]["decision"], false);
        assert_eq!(items[2]["decision"], Value::Null);
    }

    #[test]
    fn test_step_payload_completion() {
        let payload = step_payload(Step::Complete);

        assert_eq!(payload["is_complete"], true);
        assert_eq!(payload["summary_url"], "/");
    }
}
