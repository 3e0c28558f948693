//! Endpoint tests over the real router: envelopes, cookies, redirects,
//! and the multipart detection flow.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use chrono::Utc;
use common::{insert_medicine, insert_member, insert_session, test_config, test_pool, test_state};
use pocket_yacsa::handlers::auth_handlers::SESSION_COOKIE;
use pocket_yacsa::routes::routes::routes;
use pocket_yacsa::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

fn app(state: AppState) -> Router {
    routes().with_state(state)
}

fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session_id) = cookie {
        builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, session_id));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_answers_ok() {
    let state = test_state().await;
    let app = app(state);

    let response = app
        .oneshot(request(Method::GET, "/healthz", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_login_is_unauthorized() {
    let state = test_state().await;
    let app = app(state);

    let response = app
        .oneshot(request(Method::GET, "/my-page/info", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["name"], "MEMBER_NOT_LOGIN");
    assert_eq!(body["httpStatus"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_redirects_with_a_persisted_state() {
    let state = test_state().await;
    let app = app(state.clone());

    let response = app
        .oneshot(request(Method::GET, "/oauth2/login", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("http://127.0.0.1:9/auth?"));
    assert!(location.contains("client_id=test-client"));

    let oauth_state = location.split("state=").nth(1).unwrap();
    let stored = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM oauth_states WHERE state = ?",
    )
    .bind(oauth_state)
    .fetch_one(&*state.db)
    .await
    .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn callback_requires_code_and_state() {
    let state = test_state().await;
    let app = app(state);

    let response = app
        .oneshot(request(Method::GET, "/oauth2/callback?state=abc", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["name"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn callback_with_unknown_state_is_rejected() {
    let state = test_state().await;
    let app = app(state);

    let response = app
        .oneshot(request(
            Method::GET,
            "/oauth2/callback?code=abc&state=never-issued",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["name"], "OAUTH_STATE_INVALID");
    assert_eq!(body["httpStatus"], "BAD_REQUEST");
}

#[tokio::test]
async fn provider_outage_surfaces_as_bad_gateway() {
    let state = test_state().await;

    // A valid pending state; the token endpoint itself is unreachable.
    sqlx::query("INSERT INTO oauth_states (state, created_at) VALUES (?, ?)")
        .bind("pending-login")
        .bind(Utc::now())
        .execute(&*state.db)
        .await
        .unwrap();
    let app = app(state);

    let response = app
        .oneshot(request(
            Method::GET,
            "/oauth2/callback?code=abc&state=pending-login",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["name"], "OAUTH_EXCHANGE_FAILED");
    assert_eq!(body["httpStatus"], "BAD_GATEWAY");
}

#[tokio::test]
async fn favorite_save_roundtrip() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let medicine_id = insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state);

    let uri = format!("/favorites?medicineId={}", medicine_id);
    let response = app
        .clone()
        .oneshot(request(Method::POST, &uri, Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["name"], "SAVE_FAVORITE_SUCCESS");
    assert_eq!(body["httpStatus"], "CREATED");

    let response = app
        .oneshot(request(Method::POST, &uri, Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["name"], "FAVORITE_ALREADY_EXIST");
    assert_eq!(body["httpStatus"], "CONFLICT");
}

#[tokio::test]
async fn medicine_detail_uses_stored_text_when_leaflet_down() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let medicine_id = insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state);

    let uri = format!("/medicines/id/{}", medicine_id);
    let response = app
        .oneshot(request(Method::GET, &uri, Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["code"], "200808876");
    assert_eq!(body["name"], "Tylenol");
    assert_eq!(body["isFavorite"], false);
    assert_eq!(body["ingredient"], serde_json::json!(["acetaminophen", "starch"]));
    assert_eq!(body["effect"], "stored effect");
    assert_eq!(body["usages"], "stored usage");
    assert_eq!(body["precautions"], "stored caution");
}

#[tokio::test]
async fn stalled_leaflet_host_falls_back_quickly() {
    use std::time::{Duration, Instant};

    // A leaflet host that accepts the connection and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let db = test_pool().await;
    let mut config = test_config();
    config.leaflet_base_url = format!("http://{}", addr);
    let state = AppState::new(db, config).unwrap();

    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let medicine_id = insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state);

    let uri = format!("/medicines/id/{}", medicine_id);
    let started = Instant::now();
    let response = app
        .oneshot(request(Method::GET, &uri, Some(&session_id)))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(response.status(), StatusCode::OK);
    // The read timeout bounds the stall.
    assert!(elapsed < Duration::from_secs(15), "fallback took {:?}", elapsed);

    let body = body_json(response).await;
    assert_eq!(body["effect"], "stored effect");
    assert_eq!(body["usages"], "stored usage");
    assert_eq!(body["precautions"], "stored caution");
}

#[tokio::test]
async fn unknown_medicine_is_not_found() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state);

    let response = app
        .oneshot(request(Method::GET, "/medicines/id/4242", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["name"], "MEDICINE_NOT_EXIST");
    assert_eq!(body["httpStatus"], "NOT_FOUND");
}

#[tokio::test]
async fn detection_multipart_roundtrip() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let medicine_id = insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state.clone());

    let boundary = "yacsa-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"pill.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\nnot-really-a-photo\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/detection")
        .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, session_id))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], medicine_id);
    assert_eq!(body["name"], "Tylenol");

    // The detection landed in the member's history.
    assert_eq!(state.detection_logs.count(member_id).await.unwrap(), 1);
}

#[tokio::test]
async fn detection_without_image_field_is_rejected() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state);

    let boundary = "yacsa-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"photo\"\r\n\r\nstuff\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/detection")
        .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, session_id))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["name"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn member_delete_invalidates_the_session() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state);

    let response = app
        .clone()
        .oneshot(request(Method::DELETE, "/members", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "DELETE_SUCCESS");

    let response = app
        .oneshot(request(Method::GET, "/my-page/info", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn my_page_payload_is_camel_case() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let medicine_id = insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;

    state.favorites.save(member_id, medicine_id).await.unwrap();
    state.detection_logs.save(member_id, medicine_id).await.unwrap();
    let app = app(state);

    let response = app
        .oneshot(request(Method::GET, "/my-page/info", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["memberName"], "Dana");
    assert_eq!(body["detectionLogCount"], 1);
    assert_eq!(body["favoriteCount"], 1);
}

#[tokio::test]
async fn junk_sort_is_rejected() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state);

    let response = app
        .oneshot(request(
            Method::GET,
            "/favorites/page/1?sort=sideways",
            Some(&session_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["name"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn detection_log_page_has_no_total_page() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let medicine_id = insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;

    state.detection_logs.save(member_id, medicine_id).await.unwrap();
    let app = app(state);

    let response = app
        .oneshot(request(
            Method::GET,
            "/detection-logs/page/1",
            Some(&session_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["memberId"], member_id);
    assert_eq!(body["total"], 1);
    assert_eq!(body["lastPage"], true);
    assert!(body.get("totalPage").is_none());
    assert_eq!(body["detectionLogs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_log_deletes_by_query_params() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    insert_medicine(&state.db, "200808876", "Tylenol").await;
    let session_id = insert_session(&state.db, member_id).await;

    state.search.search_page(member_id, "Tylenol", 1).await.unwrap();
    let log = state.search.recent_logs(member_id).await.unwrap().remove(0);
    let app = app(state);

    let uri = format!("/search-logs?name={}&createdAt={}", log.name, log.created_at);
    let response = app
        .clone()
        .oneshot(request(Method::DELETE, &uri, Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "DELETE_SEARCH_LOG_SUCCESS");

    // Nothing left to delete.
    let response = app
        .oneshot(request(Method::DELETE, "/search-logs/all", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["name"], "SEARCH_LOG_NOT_EXIST");
}

#[tokio::test]
async fn logout_clears_cookie_and_session() {
    let state = test_state().await;
    let member_id = insert_member(&state.db, "Dana", "dana@example.com").await;
    let session_id = insert_session(&state.db, member_id).await;
    let app = app(state.clone());

    let response = app
        .oneshot(request(Method::GET, "/oauth2/logout", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/oauth2/logout-success");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    let sessions = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions")
        .fetch_one(&*state.db)
        .await
        .unwrap();
    assert_eq!(sessions, 0);
}
