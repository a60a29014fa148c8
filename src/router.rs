use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;

use crate::db::GalleryStore;
use crate::handlers::{admin, api, public, reset};

/// Settings for `/reset_admin`. The route stays disabled while `token` is
/// `None`.
#[derive(Clone)]
pub struct ResetSettings {
    pub username: String,
    pub password: String,
    pub token: Option<String>,
}

/// Shared application state; cheap to clone per request.
#[derive(Clone)]
pub struct AtelierState {
    pub store: GalleryStore,
    pub reset: ResetSettings,
    key: Key,
}

impl AtelierState {
    pub fn new(store: GalleryStore, secret_key: &str, reset: ResetSettings) -> Self {
        Self {
            store,
            reset,
            key: session_key(secret_key),
        }
    }
}

// lets PrivateCookieJar pull its key straight from the state
impl FromRef<AtelierState> for Key {
    fn from_ref(state: &AtelierState) -> Key {
        state.key.clone()
    }
}

/// Derive the private-cookie key from the configured secret. The secret is
/// repeated to 64 bytes of material first; `Key::derive_from` requires at
/// least 32.
fn session_key(secret: &str) -> Key {
    assert!(!secret.is_empty(), "session secret must not be empty");
    let mut material = Vec::with_capacity(64 + secret.len());
    while material.len() < 64 {
        material.extend_from_slice(secret.as_bytes());
    }
    Key::derive_from(&material)
}

pub fn atelier_router(state: AtelierState) -> Router {
    Router::new()
        .route("/", get(public::home))
        .route("/gallery", get(public::gallery))
        .route("/design/{id}", get(public::design_detail))
        .route("/about", get(public::about))
        .route("/contact", get(public::contact))
        .route("/admin/login", get(admin::login_form).post(admin::login_submit))
        .route("/admin/logout", get(admin::logout))
        .route("/admin", get(admin::dashboard))
        .route(
            "/admin/categories",
            get(admin::categories_page).post(admin::category_create),
        )
        .route("/admin/categories/edit/{id}", post(admin::category_edit))
        .route("/admin/categories/delete/{id}", post(admin::category_delete))
        .route("/admin/designs", get(admin::designs_page))
        .route("/admin/designs/add", post(admin::design_add))
        .route("/admin/designs/edit/{id}", post(admin::design_edit))
        .route("/admin/designs/delete/{id}", post(admin::design_delete))
        .route(
            "/admin/designs/toggle_featured/{id}",
            post(admin::toggle_featured),
        )
        .route("/api/search", get(api::search))
        .route("/reset_admin", get(reset::reset_admin))
        .with_state(state)
}
