//! src/services/auth_service.rs
//!
//! AuthService — OAuth2 authorization-code login with server-side sessions.
//! The login URL carries a persisted random state; the callback consumes
//! the state, exchanges the code at the provider, signs the member up on
//! first login, and mints a session row whose id travels in a cookie.

use crate::config::OAuthConfig;
use crate::errors::ApiError;
use crate::models::member::{Member, UserProfile};
use crate::models::session::Session;
use crate::services::member_service::{MemberError, MemberService};
use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Pending login states older than this are rejected.
const STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not logged in")]
    NotLogin,
    #[error("login state is unknown or expired")]
    StateInvalid,
    #[error("provider exchange failed: {0}")]
    ExchangeFailed(String),
    #[error(transparent)]
    Member(#[from] MemberError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::NotLogin => {
                ApiError::new("MEMBER_NOT_LOGIN", StatusCode::UNAUTHORIZED, message)
            }
            AuthError::StateInvalid => {
                ApiError::new("OAUTH_STATE_INVALID", StatusCode::BAD_REQUEST, message)
            }
            AuthError::ExchangeFailed(_) => {
                ApiError::new("OAUTH_EXCHANGE_FAILED", StatusCode::BAD_GATEWAY, message)
            }
            AuthError::Member(inner) => ApiError::from(inner),
            AuthError::Sqlx(_) => ApiError::internal(message),
        }
    }
}

/// Token endpoint answer. Only the access token is used.
#[derive(Debug, Deserialize)]
struct TokenRes {
    access_token: String,
}

/// Userinfo endpoint answer (OpenID Connect shape).
#[derive(Debug, Deserialize)]
struct UserInfoRes {
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Outbound client for the provider's token/userinfo endpoints.
    http: reqwest::Client,

    /// Provider endpoints and client credentials.
    oauth: OAuthConfig,

    /// Member sign-up and lookups during the callback.
    members: MemberService,
}

impl AuthService {
    pub fn new(
        db: Arc<SqlitePool>,
        http: reqwest::Client,
        oauth: OAuthConfig,
        members: MemberService,
    ) -> Self {
        Self {
            db,
            http,
            oauth,
            members,
        }
    }

    /// Build the provider authorize URL with a fresh persisted state.
    /// States left behind by abandoned logins are swept once expired.
    pub async fn authorize_url(&self) -> AuthResult<String> {
        let state = Uuid::new_v4().to_string();

        sqlx::query("DELETE FROM oauth_states WHERE created_at < ?")
            .bind(Utc::now() - Duration::minutes(STATE_TTL_MINUTES))
            .execute(&*self.db)
            .await?;

        sqlx::query("INSERT INTO oauth_states (state, created_at) VALUES (?, ?)")
            .bind(&state)
            .bind(Utc::now())
            .execute(&*self.db)
            .await?;

        let url = reqwest::Url::parse_with_params(
            &self.oauth.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.oauth.client_id.as_str()),
                ("redirect_uri", self.oauth.redirect_url.as_str()),
                ("scope", "openid email profile"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|err| AuthError::ExchangeFailed(format!("authorize url invalid: {}", err)))?;

        Ok(url.to_string())
    }

    /// Complete the callback: validate the state, exchange the code, sign
    /// the member up if needed, and mint a session.
    pub async fn login(&self, code: &str, state: &str) -> AuthResult<Session> {
        self.consume_state(state).await?;
        let profile = self.exchange_code(code).await?;

        self.members.sign_up_if_absent(&profile).await?;
        let member = self.members.find_active_by_email(&profile.email).await?;

        let session = self.create_session(member.id).await?;
        info!("member {} logged in", member.id);
        Ok(session)
    }

    /// Drop a session row. Logging out an already-dead session is a no-op.
    pub async fn logout(&self, session_id: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id)
            .execute(&*self.db)
            .await?;
        Ok(())
    }

    /// Resolve a session cookie to its member.
    ///
    /// NotLogin when the session is unknown; MEMBER_NOT_EXIST when the
    /// session points at a soft-deleted account.
    pub async fn member_for_session(&self, session_id: &str) -> AuthResult<Member> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT m.id, m.name, m.email, m.picture, m.deleted, m.created_at, m.updated_at
             FROM sessions s
             JOIN members m ON m.id = s.member_id
             WHERE s.id = ?",
        )
        .bind(session_id)
        .fetch_optional(&*self.db)
        .await?;

        match member {
            None => Err(AuthError::NotLogin),
            Some(member) if member.deleted => Err(AuthError::Member(MemberError::NotExist)),
            Some(member) => Ok(member),
        }
    }

    /// Validate and consume a pending login state (single use, 10 minute TTL).
    async fn consume_state(&self, state: &str) -> AuthResult<()> {
        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "DELETE FROM oauth_states WHERE state = ? RETURNING created_at",
        )
        .bind(state)
        .fetch_optional(&*self.db)
        .await?;

        match created_at {
            None => Err(AuthError::StateInvalid),
            Some(created_at) if Utc::now() - created_at > Duration::minutes(STATE_TTL_MINUTES) => {
                Err(AuthError::StateInvalid)
            }
            Some(_) => Ok(()),
        }
    }

    /// Exchange the authorization code for an access token, then fetch the
    /// userinfo profile with it.
    async fn exchange_code(&self, code: &str) -> AuthResult<UserProfile> {
        let token_response = self
            .http
            .post(&self.oauth.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("redirect_uri", self.oauth.redirect_url.as_str()),
            ])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                warn!("token exchange failed: {}", err);
                AuthError::ExchangeFailed(format!("token endpoint: {}", err))
            })?;

        let token = token_response.json::<TokenRes>().await.map_err(|err| {
            warn!("token answer unparsable: {}", err);
            AuthError::ExchangeFailed(format!("token endpoint: {}", err))
        })?;

        let userinfo_response = self
            .http
            .get(&self.oauth.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                warn!("userinfo fetch failed: {}", err);
                AuthError::ExchangeFailed(format!("userinfo endpoint: {}", err))
            })?;

        let info = userinfo_response.json::<UserInfoRes>().await.map_err(|err| {
            warn!("userinfo answer unparsable: {}", err);
            AuthError::ExchangeFailed(format!("userinfo endpoint: {}", err))
        })?;

        Ok(UserProfile {
            name: info.name.unwrap_or_else(|| info.email.clone()),
            email: info.email,
            picture: info.picture.unwrap_or_default(),
        })
    }

    /// Mint a session row for this member.
    async fn create_session(&self, member_id: i64) -> AuthResult<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            member_id,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO sessions (id, member_id, created_at) VALUES (?, ?, ?)")
            .bind(&session.id)
            .bind(session.member_id)
            .bind(session.created_at)
            .execute(&*self.db)
            .await?;

        Ok(session)
    }
}
