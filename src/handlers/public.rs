//! Public routes: home, gallery, design detail, about, contact.

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::error::AtelierError;
use crate::middleware::flash;
use crate::router::AtelierState;
use crate::views;

/// Designs shown per strip on the home page.
const HOME_STRIP_LIMIT: i64 = 6;

type Page = (PrivateCookieJar, Html<String>);

pub async fn home(
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
) -> Result<Page, AtelierError> {
    let featured = state.store.featured_designs(HOME_STRIP_LIMIT).await?;
    let newest = state.store.newest_designs(HOME_STRIP_LIMIT).await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::home_page(&flash, &featured, &newest)))
}

#[derive(Debug, Deserialize)]
pub struct GalleryParams {
    pub q: Option<String>,
    pub cat: Option<String>,
    pub view: Option<String>,
}

pub async fn gallery(
    State(state): State<AtelierState>,
    Query(params): Query<GalleryParams>,
    jar: PrivateCookieJar,
) -> Result<Page, AtelierError> {
    let q = params.q.as_deref().unwrap_or("").trim().to_string();
    // an unparsable `cat` reads as "no category filter", like the blank option
    let cat_id = params.cat.as_deref().and_then(|c| c.parse::<i64>().ok());
    let view = match params.view.as_deref() {
        Some("list") => "list",
        _ => "grid",
    };

    let designs = state
        .store
        .search_designs((!q.is_empty()).then_some(q.as_str()), cat_id)
        .await?;
    let categories = state.store.list_categories().await?;
    let (jar, flash) = flash::take(jar);
    Ok((
        jar,
        views::gallery_page(&flash, &designs, &categories, &q, cat_id, view),
    ))
}

pub async fn design_detail(
    State(state): State<AtelierState>,
    Path(design_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<Page, AtelierError> {
    let design = state
        .store
        .design_with_category(design_id)
        .await?
        .ok_or(AtelierError::NotFound("design"))?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::design_detail_page(&flash, &design)))
}

pub async fn about(
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
) -> Result<Page, AtelierError> {
    let total_designs = state.store.count_designs().await?;
    let total_categories = state.store.count_categories().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::about_page(&flash, total_designs, total_categories)))
}

pub async fn contact(jar: PrivateCookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    (jar, views::contact_page(&flash))
}
