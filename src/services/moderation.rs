// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content-safety checks for uploads.
//!
//! Uploads are screened by a serverless function that wraps a third-party
//! moderation API. The check fails open: if the function is missing,
//! unreachable or returns something unexpected, the upload is treated as safe.

use crate::models::MediaType;
use serde::{Deserialize, Serialize};

/// Result of a moderation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub safe: bool,
    /// Flagged categories reported by the provider (empty when safe)
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ModerationVerdict {
    fn fail_open() -> Self {
        Self {
            safe: true,
            categories: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct ModerationRequest<'a> {
    media_url: &'a str,
    media_type: MediaType,
}

/// Client for the moderation function.
#[derive(Clone)]
pub struct ModerationService {
    http: reqwest::Client,
    function_url: Option<String>,
    anon_key: String,
}

impl ModerationService {
    pub fn new(function_url: Option<String>, anon_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            function_url,
            anon_key,
        }
    }

    /// Check a stored media file. Never fails; errors yield a "safe" verdict.
    pub async fn check(&self, media_url: &str, media_type: MediaType) -> ModerationVerdict {
        let Some(function_url) = &self.function_url else {
            tracing::warn!("Moderation function not configured; allowing upload");
            return ModerationVerdict::fail_open();
        };

        let response = self
            .http
            .post(function_url)
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .json(&ModerationRequest {
                media_url,
                media_type,
            })
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Moderation function unreachable; allowing upload");
                return ModerationVerdict::fail_open();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Moderation function returned error; allowing upload");
            return ModerationVerdict::fail_open();
        }

        match response.json::<ModerationVerdict>().await {
            Ok(verdict) => {
                if !verdict.safe {
                    tracing::info!(
                        media_url,
                        categories = ?verdict.categories,
                        "Upload flagged by moderation"
                    );
                }
                verdict
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unparsable moderation verdict; allowing upload");
                ModerationVerdict::fail_open()
            }
        }
    }
}
