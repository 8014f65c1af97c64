// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SpotHop: discover, share and discuss skate spots
//!
//! This crate provides the filtering core behind the SpotHop map and feed
//! (distance, viewport queries, feed filters and contest eligibility) and a
//! small API that serves it next to the hosted backend.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{BackendClient, GeocodingService, ModerationService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub geocoding: GeocodingService,
    pub moderation: ModerationService,
    pub backend: BackendClient,
}

impl AppState {
    /// Wire up the upstream clients from configuration.
    pub fn from_config(config: Config) -> Self {
        let geocoding = GeocodingService::new(
            config.geocoding_url.clone(),
            config.geocoding_user_agent.clone(),
            std::sync::Arc::new(dashmap::DashMap::new()),
        );
        let moderation = ModerationService::new(
            config.moderation_function_url.clone(),
            config.backend_anon_key.clone(),
        );
        let backend = BackendClient::new(&config.backend_url, config.backend_anon_key.clone());

        Self {
            config,
            geocoding,
            moderation,
            backend,
        }
    }
}
