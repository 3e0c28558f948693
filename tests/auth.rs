//! Login-state validation and provider failures in the OAuth2 callback
//! flow. The provider endpoints in the test config are unreachable, so any
//! exchange attempt fails fast.

mod common;

use chrono::{DateTime, Duration, Utc};
use common::test_state;
use pocket_yacsa::services::auth_service::AuthError;
use sqlx::SqlitePool;

async fn insert_state(db: &SqlitePool, state: &str, created_at: DateTime<Utc>) {
    sqlx::query("INSERT INTO oauth_states (state, created_at) VALUES (?, ?)")
        .bind(state)
        .bind(created_at)
        .execute(db)
        .await
        .unwrap();
}

async fn state_count(db: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM oauth_states")
        .fetch_one(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn unknown_state_is_rejected() {
    let state = test_state().await;

    let err = state.auth.login("code", "never-issued").await.unwrap_err();
    assert!(matches!(err, AuthError::StateInvalid));
}

#[tokio::test]
async fn expired_state_is_rejected_and_consumed() {
    let state = test_state().await;

    insert_state(&state.db, "stale-login", Utc::now() - Duration::minutes(11)).await;

    let err = state.auth.login("code", "stale-login").await.unwrap_err();
    assert!(matches!(err, AuthError::StateInvalid));

    // Rejection still burns the state; it cannot be replayed.
    assert_eq!(state_count(&state.db).await, 0);
}

#[tokio::test]
async fn failed_exchange_still_consumes_the_state() {
    let state = test_state().await;

    insert_state(&state.db, "pending-login", Utc::now()).await;

    let err = state.auth.login("code", "pending-login").await.unwrap_err();
    assert!(matches!(err, AuthError::ExchangeFailed(_)));
    assert_eq!(state_count(&state.db).await, 0);
}

#[tokio::test]
async fn login_click_sweeps_abandoned_states() {
    let state = test_state().await;

    insert_state(&state.db, "stale-login", Utc::now() - Duration::minutes(11)).await;
    insert_state(&state.db, "pending-login", Utc::now()).await;

    state.auth.authorize_url().await.unwrap();

    // The expired leftover is gone; the live one and the fresh one remain.
    let states = sqlx::query_scalar::<_, String>("SELECT state FROM oauth_states")
        .fetch_all(&*state.db)
        .await
        .unwrap();
    assert_eq!(states.len(), 2);
    assert!(states.iter().any(|s| s == "pending-login"));
    assert!(states.iter().all(|s| s != "stale-login"));
}
