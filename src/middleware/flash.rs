//! One-shot flash messages carried in a private cookie.
//!
//! Mutating admin routes push a `(level, message)` pair and redirect; the
//! next rendered page takes the pending messages and clears the cookie.

use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "atelier_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
            FlashLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Append a message to the pending flash cookie.
pub fn push(jar: PrivateCookieJar, level: FlashLevel, message: &str) -> PrivateCookieJar {
    let mut pending = peek(&jar);
    pending.push(FlashMessage {
        level,
        message: message.to_string(),
    });
    let value = serde_json::to_string(&pending).unwrap_or_default();
    let mut cookie = Cookie::new(FLASH_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    jar.add(cookie)
}

/// Take all pending messages, clearing the cookie.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<FlashMessage>) {
    let pending = peek(&jar);
    if pending.is_empty() {
        return (jar, pending);
    }
    let mut cookie = Cookie::from(FLASH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), pending)
}

fn peek(jar: &PrivateCookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}
