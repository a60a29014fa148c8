//! Configuration-driven admin credential reset.
//!
//! The upstream deployment exposed this without any authentication. Here the
//! route stays 404 until `RESET_ADMIN_TOKEN` is configured, and then requires
//! the caller to present that token; with a valid token the behavior is the
//! historical one, overwriting the admin row and echoing the new plaintext
//! credentials.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::AtelierError;
use crate::password;
use crate::router::AtelierState;

#[derive(Debug, Deserialize)]
pub struct ResetParams {
    pub token: Option<String>,
}

/// GET /reset_admin?token=
pub async fn reset_admin(
    State(state): State<AtelierState>,
    Query(params): Query<ResetParams>,
) -> Result<Response, AtelierError> {
    // unset token keeps the route indistinguishable from a missing one
    let Some(expected) = state.reset.token.as_deref() else {
        return Ok((StatusCode::NOT_FOUND, "Not found").into_response());
    };
    let supplied = params.token.as_deref().unwrap_or("");
    if supplied.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() != 1 {
        return Ok((StatusCode::NOT_FOUND, "Not found").into_response());
    }

    let hash = password::hash_password(&state.reset.password)?;
    state
        .store
        .overwrite_admin(&state.reset.username, &hash)
        .await?;
    warn!(username = %state.reset.username, "admin credentials overwritten via /reset_admin");

    Ok(format!(
        "Admin updated → Username: {}, Password: {}",
        state.reset.username, state.reset.password
    )
    .into_response())
}
