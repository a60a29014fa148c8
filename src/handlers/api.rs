//! JSON search API.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::db::models::DesignWithCategory;
use crate::error::AtelierError;
use crate::router::AtelierState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /api/search?q=
///
/// Same matching and ordering as the gallery; the full result set as JSON
/// records, no pagination. An absent or blank `q` matches everything.
pub async fn search(
    State(state): State<AtelierState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<DesignWithCategory>>, AtelierError> {
    let q = params.q.as_deref().unwrap_or("").trim().to_string();
    let results = state
        .store
        .search_designs((!q.is_empty()).then_some(q.as_str()), None)
        .await?;
    Ok(Json(results))
}
