//! HTTP handlers for OAuth2 login and logout.
//! The session id travels in an HttpOnly cookie; `CurrentMember` is the
//! extractor that turns that cookie back into a member row.

use crate::{
    errors::{ApiError, CommonResponse},
    models::member::Member,
    services::auth_service::AuthError,
    state::AppState,
};
use axum::{
    extract::{FromRequestParts, Query, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "yacsa_session";

/// Query params of the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// The logged-in member behind the request's session cookie.
///
/// Rejects with `MEMBER_NOT_LOGIN` when the cookie is missing or the
/// session is unknown, and with `MEMBER_NOT_EXIST` when the session
/// points at a deleted account.
pub struct CurrentMember(pub Member);

impl FromRequestParts<AppState> for CurrentMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id =
            session_cookie_value(&parts.headers).ok_or(AuthError::NotLogin).map_err(ApiError::from)?;
        let member = state.auth.member_for_session(&session_id).await?;
        Ok(CurrentMember(member))
    }
}

/// GET `/oauth2/login` — redirect to the provider's consent screen.
pub async fn login(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let url = state.auth.authorize_url().await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]))
}

/// GET `/oauth2/callback` — complete the login and set the session cookie.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let code = query
        .code
        .ok_or_else(|| ApiError::validation("code query parameter is required"))?;
    let oauth_state = query
        .state
        .ok_or_else(|| ApiError::validation("state query parameter is required"))?;

    let session = state.auth.login(&code, &oauth_state).await?;

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session.id
    );
    Ok((
        StatusCode::FOUND,
        [
            (header::SET_COOKIE, cookie),
            (header::LOCATION, "/oauth2/login-success".to_string()),
        ],
    )
        .into_response())
}

/// GET `/oauth2/login-success` — confirmation the callback redirects to.
pub async fn login_success() -> CommonResponse {
    CommonResponse::ok("LOGIN_SUCCESS", "login succeeded")
}

/// GET `/oauth2/logout` — drop the session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(session_id) = session_cookie_value(&headers) {
        state.auth.logout(&session_id).await?;
    }

    let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    Ok((
        StatusCode::FOUND,
        [
            (header::SET_COOKIE, cookie),
            (header::LOCATION, "/oauth2/logout-success".to_string()),
        ],
    )
        .into_response())
}

/// GET `/oauth2/logout-success` — confirmation the logout redirects to.
pub async fn logout_success() -> CommonResponse {
    CommonResponse::ok("LOGOUT_SUCCESS", "logout succeeded")
}

/// Pull the session cookie value out of the request's Cookie headers.
fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        let Ok(raw) = header_value.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}
