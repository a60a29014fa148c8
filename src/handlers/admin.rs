//! Admin panel: login/logout, dashboard, category and design management.
//!
//! Every management route takes the [`RequireAdmin`] guard; mutations follow
//! post-redirect-get with a flash message describing the outcome.

use axum::Json;
use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::db::models::DesignInput;
use crate::error::AtelierError;
use crate::middleware::auth::{AdminSession, RequireAdmin};
use crate::middleware::flash::{self, FlashLevel};
use crate::password;
use crate::router::AtelierState;
use crate::views;

type Page = (PrivateCookieJar, Html<String>);
type FlashRedirect = (PrivateCookieJar, Redirect);

// ----- login / logout -----

#[derive(Debug, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

pub async fn login_form(Query(params): Query<NextParam>, jar: PrivateCookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    (jar, views::login_page(&flash, params.next.as_deref().unwrap_or("")))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

pub async fn login_submit(
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<FlashRedirect, AtelierError> {
    let admin = state.store.admin_by_username(&form.username).await?;

    if let Some(admin) = admin
        && password::verify_password(&form.password, &admin.password_hash)?
    {
        info!(username = %admin.username, "admin logged in");
        let session = AdminSession {
            admin_id: admin.id,
            admin_username: admin.username,
        };
        let jar = session.attach(jar);
        let jar = flash::push(jar, FlashLevel::Success, "Logged in");
        return Ok((jar, Redirect::to(&sanitize_next(form.next.as_deref()))));
    }

    // same message for unknown username and wrong password
    let jar = flash::push(jar, FlashLevel::Danger, "Invalid credentials");
    let back = match form.next.as_deref() {
        Some(next) if !next.is_empty() => format!("/admin/login?next={next}"),
        _ => "/admin/login".to_string(),
    };
    Ok((jar, Redirect::to(&back)))
}

/// Only same-site absolute paths are honored as post-login targets.
fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next.to_string(),
        _ => "/admin".to_string(),
    }
}

pub async fn logout(jar: PrivateCookieJar) -> FlashRedirect {
    let jar = AdminSession::clear(jar);
    let jar = flash::push(jar, FlashLevel::Info, "Logged out");
    (jar, Redirect::to("/"))
}

// ----- dashboard -----

pub async fn dashboard(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
) -> Result<Page, AtelierError> {
    let total_designs = state.store.count_designs().await?;
    let total_categories = state.store.count_categories().await?;
    let total_featured = state.store.count_featured().await?;
    let categories = state.store.list_categories().await?;
    let (jar, flash) = flash::take(jar);
    Ok((
        jar,
        views::dashboard_page(&flash, total_designs, total_categories, total_featured, &categories),
    ))
}

// ----- categories -----

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

pub async fn categories_page(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
) -> Result<Page, AtelierError> {
    let categories = state.store.list_categories().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::categories_page(&flash, &categories)))
}

pub async fn category_create(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
    Form(form): Form<CategoryForm>,
) -> Result<FlashRedirect, AtelierError> {
    let name = form.name.trim();
    let jar = if name.is_empty() {
        flash::push(jar, FlashLevel::Danger, "Name required")
    } else {
        match state.store.create_category(name).await {
            Ok(()) => flash::push(jar, FlashLevel::Success, "Category added"),
            Err(e) if e.is_constraint_violation() => {
                flash::push(jar, FlashLevel::Danger, "Category could not be added (maybe exists)")
            }
            Err(e) => return Err(e),
        }
    };
    Ok((jar, Redirect::to("/admin/categories")))
}

pub async fn category_edit(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    Path(cat_id): Path<i64>,
    jar: PrivateCookieJar,
    Form(form): Form<CategoryForm>,
) -> Result<FlashRedirect, AtelierError> {
    let name = form.name.trim();
    let jar = if name.is_empty() {
        // empty rename is a silent no-op
        jar
    } else {
        match state.store.rename_category(cat_id, name).await {
            Ok(()) => flash::push(jar, FlashLevel::Success, "Category updated"),
            Err(e) if e.is_constraint_violation() => {
                flash::push(jar, FlashLevel::Danger, "Category could not be updated (maybe exists)")
            }
            Err(e) => return Err(e),
        }
    };
    Ok((jar, Redirect::to("/admin/categories")))
}

pub async fn category_delete(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    Path(cat_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<FlashRedirect, AtelierError> {
    state.store.delete_category(cat_id).await?;
    let jar = flash::push(jar, FlashLevel::Info, "Category deleted");
    Ok((jar, Redirect::to("/admin/categories")))
}

// ----- designs -----

#[derive(Debug, Deserialize)]
pub struct DesignForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    pub category: Option<String>,
    /// Checkbox; browsers send `on` when checked and omit the field otherwise.
    pub featured: Option<String>,
}

impl DesignForm {
    /// Trim and validate into store input. `None` means a required field
    /// was empty.
    fn into_input(self) -> Option<DesignInput> {
        let title = self.title.trim();
        let image_url = self.image_url.trim();
        if title.is_empty() || image_url.is_empty() {
            return None;
        }
        Some(DesignInput {
            title: title.to_string(),
            image_url: image_url.to_string(),
            category_id: self.category.as_deref().and_then(|c| c.parse().ok()),
            featured: self.featured.as_deref() == Some("on"),
        })
    }
}

pub async fn designs_page(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
) -> Result<Page, AtelierError> {
    let designs = state.store.list_designs_with_categories().await?;
    let categories = state.store.list_categories().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::designs_page(&flash, &designs, &categories)))
}

pub async fn design_add(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
    Form(form): Form<DesignForm>,
) -> Result<FlashRedirect, AtelierError> {
    let Some(input) = form.into_input() else {
        let jar = flash::push(jar, FlashLevel::Danger, "Title and image URL required");
        return Ok((jar, Redirect::to("/admin/designs")));
    };
    state.store.create_design(&input).await?;
    let jar = flash::push(jar, FlashLevel::Success, "Design added");
    Ok((jar, Redirect::to("/admin/designs")))
}

pub async fn design_edit(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    Path(design_id): Path<i64>,
    jar: PrivateCookieJar,
    Form(form): Form<DesignForm>,
) -> Result<FlashRedirect, AtelierError> {
    let Some(input) = form.into_input() else {
        let jar = flash::push(jar, FlashLevel::Danger, "Title and image URL required");
        return Ok((jar, Redirect::to("/admin/designs")));
    };
    state.store.update_design(design_id, &input).await?;
    let jar = flash::push(jar, FlashLevel::Success, "Design updated");
    Ok((jar, Redirect::to("/admin/designs")))
}

pub async fn design_delete(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    Path(design_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<FlashRedirect, AtelierError> {
    state.store.delete_design(design_id).await?;
    let jar = flash::push(jar, FlashLevel::Info, "Design deleted");
    Ok((jar, Redirect::to("/admin/designs")))
}

/// POST /admin/designs/toggle_featured/{id}
///
/// JSON endpoint: flips the flag and answers with the new state, or a
/// structured not-found failure.
pub async fn toggle_featured(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AtelierState>,
    Path(design_id): Path<i64>,
) -> Result<Response, AtelierError> {
    let Some(current) = state.store.design_featured(design_id).await? else {
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "ok": false }))).into_response());
    };
    let flipped = !current;
    state.store.set_featured(design_id, flipped).await?;
    Ok(Json(json!({ "ok": true, "featured": flipped })).into_response())
}
