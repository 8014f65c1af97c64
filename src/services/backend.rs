// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Thin client for the hosted relational data service (PostgREST).
//!
//! Only the writes this service performs on behalf of the user live here.
//! Requests carry the user's own session token so row-level security applies.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const DUPLICATE_FLAG_MESSAGE: &str = "You have already flagged this spot";

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

#[derive(Serialize)]
struct SpotFlagInsert<'a> {
    spot_id: &'a str,
    user_id: &'a str,
    reason: &'a str,
}

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

impl BackendClient {
    pub fn new(backend_url: &str, anon_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{backend_url}/rest/v1"),
            anon_key,
        }
    }

    /// Report a spot. A second report by the same user is a `Duplicate` error.
    pub async fn flag_spot(
        &self,
        user_token: &str,
        user_id: &str,
        spot_id: &str,
        reason: &str,
    ) -> Result<(), AppError> {
        let url = format!("{}/spot_flags", self.rest_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(user_token)
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .json(&SpotFlagInsert {
                spot_id,
                user_id,
                reason,
            })
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(spot_id, user_id, "Spot flagged");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_postgrest_error(status, &body))
    }
}

fn map_postgrest_error(status: reqwest::StatusCode, body: &str) -> AppError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => AppError::from_backend(err.code.as_deref(), &err.message, DUPLICATE_FLAG_MESSAGE),
        Err(_) => AppError::Backend(format!("Data service returned {status}")),
    }
}
