//! Shared fixtures: an in-memory database with the schema applied, a
//! config whose outbound hosts are unreachable (so leaflet fetches fall
//! back to the stored columns immediately), and seed helpers.

use chrono::Utc;
use pocket_yacsa::config::{AppConfig, OAuthConfig};
use pocket_yacsa::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory database with the schema applied. One connection, so every
/// query sees the same memory database.
pub async fn test_pool() -> Arc<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let schema = include_str!("../../migrations/0001_init.sql");
    for stmt in schema.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(stmt).execute(&pool).await.unwrap();
    }

    Arc::new(pool)
}

/// Config with no AI endpoint (mock detector) and unreachable outbound
/// hosts.
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: "sqlite::memory:".into(),
        ai_url: None,
        leaflet_base_url: "http://127.0.0.1:9".into(),
        oauth: OAuthConfig {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            auth_url: "http://127.0.0.1:9/auth".into(),
            token_url: "http://127.0.0.1:9/token".into(),
            userinfo_url: "http://127.0.0.1:9/userinfo".into(),
            redirect_url: "http://127.0.0.1:9/callback".into(),
        },
    }
}

/// Fresh state over a fresh in-memory database.
pub async fn test_state() -> AppState {
    let db = test_pool().await;
    AppState::new(db, test_config()).unwrap()
}

/// Seed an active member, returning its id.
pub async fn insert_member(db: &SqlitePool, name: &str, email: &str) -> i64 {
    let now = Utc::now();
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO members (name, email, picture, deleted, created_at, updated_at)
         VALUES (?, ?, '', 0, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await
    .unwrap()
}

/// Seed a medicine with fixed leaflet fallback text, returning its id.
pub async fn insert_medicine(db: &SqlitePool, code: &str, name: &str) -> i64 {
    let now = Utc::now();
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO medicines
             (code, name, company, ingredient, image, effect, usages, precautions,
              created_at, updated_at)
         VALUES (?, ?, 'Daehan Pharm', 'acetaminophen|starch', '', 'stored effect',
                 'stored usage', 'stored caution', ?, ?)
         RETURNING id",
    )
    .bind(code)
    .bind(name)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await
    .unwrap()
}

/// Seed a session for the member, returning the session id for the cookie.
pub async fn insert_session(db: &SqlitePool, member_id: i64) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (id, member_id, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(member_id)
        .bind(Utc::now())
        .execute(db)
        .await
        .unwrap();
    id
}
