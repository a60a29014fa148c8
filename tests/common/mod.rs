//! Shared helpers for the integration tests: a router over a throwaway
//! SQLite database plus request/response utilities.
#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use atelier::db::GalleryStore;
use atelier::{AtelierState, ResetSettings, atelier_router, password};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response};
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PW: &str = "admin123";
pub const RESET_USER: &str = "RBADMINS";
pub const RESET_PW: &str = "RB_ADMINS_03";
pub const RESET_TOKEN: &str = "maintenance-token";

pub struct TestApp {
    pub app: Router,
    pub store: GalleryStore,
    pub db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

/// Bootstrapped app with the reset endpoint enabled under [`RESET_TOKEN`].
pub async fn spawn_app(tag: &str) -> TestApp {
    spawn_app_with(tag, Some(RESET_TOKEN)).await
}

pub async fn spawn_app_with(tag: &str, reset_token: Option<&str>) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "atelier-it-{}-{}-{}.sqlite",
        tag,
        std::process::id(),
        nanos
    ));
    let database_url = format!("sqlite:{}", db_path.display());

    let store = GalleryStore::connect(&database_url)
        .await
        .expect("connect failed");
    store.init_schema().await.expect("schema init failed");
    let hash = password::hash_password(ADMIN_PW).expect("hashing failed");
    store.seed_admin(ADMIN_USER, &hash).await.expect("seed failed");

    let reset = ResetSettings {
        username: RESET_USER.to_string(),
        password: RESET_PW.to_string(),
        token: reset_token.map(str::to_string),
    };
    let state = AtelierState::new(store.clone(), "an-integration-test-secret", reset);
    TestApp {
        app: atelier_router(state),
        store,
        db_path,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn get_with_cookies(uri: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookies)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_form(uri: &str, body: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookies) = cookies {
        builder = builder.header(COOKIE, cookies);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

/// Fold every `Set-Cookie` of a response into a single `Cookie` header value.
pub fn cookies_from(resp: &Response<Body>) -> String {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn location(resp: &Response<Body>) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

/// Log in with the seeded credentials and return the session cookies.
pub async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(post_form(
            "/admin/login",
            &format!("username={ADMIN_USER}&password={ADMIN_PW}"),
            None,
        ))
        .await
        .expect("request failed");
    assert!(resp.status().is_redirection(), "login should redirect");
    cookies_from(&resp)
}
