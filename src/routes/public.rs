// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routes that work without a session (sign-up flow).

use crate::services::validate_username;
use crate::AppState;
use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/username/check", get(check_username))
}

#[derive(Deserialize)]
struct UsernameQuery {
    #[serde(default)]
    username: String,
}

/// Result of the local username rules. Availability is checked by the
/// client against the data service once this passes.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UsernameCheckResponse {
    pub valid: bool,
    pub normalized: Option<String>,
    pub error: Option<String>,
}

async fn check_username(Query(params): Query<UsernameQuery>) -> Json<UsernameCheckResponse> {
    let response = match validate_username(&params.username) {
        Ok(normalized) => UsernameCheckResponse {
            valid: true,
            normalized: Some(normalized),
            error: None,
        },
        Err(e) => {
            tracing::debug!(reason = %e, "Username rejected");
            UsernameCheckResponse {
                valid: false,
                normalized: None,
                error: Some(e.to_string()),
            }
        }
    };
    Json(response)
}
