//! Authentication plumbing: password hashing, session tokens, and the
//! extractor that resolves the calling account for handlers.

mod password;
mod token;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::directory::User;
use crate::error::BoardError;
use crate::state::BoardState;

pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
pub use token::{Claims, SessionKeys};

pub const SESSION_COOKIE: &str = "token";

/// Account resolved from the session cookie or bearer header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    BoardState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BoardError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = BoardState::from_ref(state);
        let token = session_token(&parts.headers).ok_or_else(unauthenticated)?;
        let claims = state.sessions.verify(&token)?;
        let user = state
            .directory
            .find(&claims.sub)?
            .ok_or_else(unauthenticated)?;
        Ok(CurrentUser(user))
    }
}

fn unauthenticated() -> BoardError {
    BoardError::Unauthorized("User not authenticated".to_string())
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Attach a freshly issued token to the response cookies.
pub fn with_session(jar: CookieJar, token: String) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true),
    )
}

pub fn without_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
