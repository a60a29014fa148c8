//! Admin session guard backed by a private (encrypted, signed) cookie.
//!
//! The cookie carries the authenticated admin's id and username as JSON.
//! A cookie that is missing, expired, or fails authentication simply reads
//! as "no session"; there is no server-side session table.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

pub const SESSION_COOKIE: &str = "atelier_session";

/// Sessions outlive a working day, not much more.
const SESSION_TTL: Duration = Duration::hours(12);

/// Authenticated admin identity attached to the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub admin_id: i64,
    pub admin_username: String,
}

impl AdminSession {
    /// Decode the identity from the jar, if a valid session cookie exists.
    pub fn from_jar(jar: &PrivateCookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        serde_json::from_str(cookie.value()).ok()
    }

    /// Attach this identity to the jar, replacing any previous session.
    pub fn attach(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        let value = serde_json::to_string(self).unwrap_or_default();
        let mut cookie = Cookie::new(SESSION_COOKIE, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(SESSION_TTL);
        jar.add(cookie)
    }

    /// Remove the session cookie unconditionally.
    pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
        let mut cookie = Cookie::from(SESSION_COOKIE);
        cookie.set_path("/");
        jar.remove(cookie)
    }
}

/// Extractor guarding admin-only routes.
///
/// Rejection is a redirect to the login form carrying the originally
/// requested path, so login can forward there after success:
///
/// ```ignore
/// async fn dashboard(RequireAdmin(session): RequireAdmin, ...) -> ... { ... }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match AdminSession::from_jar(&jar) {
            Some(session) => Ok(Self(session)),
            None => {
                let target = format!("/admin/login?next={}", parts.uri.path());
                Err(Redirect::to(&target).into_response())
            }
        }
    }
}
