// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str = "spothop/0.1 (+https://spothop.app)";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Hosted backend project URL (auth, REST, storage, functions)
    pub backend_url: String,
    /// Public anon key sent with every backend request
    pub backend_anon_key: String,
    /// Secret the backend signs session JWTs with (raw bytes)
    pub backend_jwt_secret: Vec<u8>,
    /// Moderation function endpoint. Unset means every upload passes.
    pub moderation_function_url: Option<String>,
    /// Nominatim-compatible geocoder
    pub geocoding_url: String,
    /// Geocoders require an identifying User-Agent
    pub geocoding_user_agent: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let backend_url = env::var("BACKEND_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .map_err(|_| ConfigError::Missing("BACKEND_URL"))?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            moderation_function_url: env::var("MODERATION_FUNCTION_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            backend_url,
            backend_anon_key: env::var("BACKEND_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("BACKEND_ANON_KEY"))?,
            backend_jwt_secret: env::var("BACKEND_JWT_SECRET")
                .map_err(|_| ConfigError::Missing("BACKEND_JWT_SECRET"))?
                .into_bytes(),
            geocoding_url: env::var("GEOCODING_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GEOCODING_URL.to_string()),
            geocoding_user_agent: env::var("GEOCODING_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Config for tests only. Points every upstream at an unroutable address.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            backend_url: "http://127.0.0.1:9".to_string(),
            backend_anon_key: "test_anon_key".to_string(),
            backend_jwt_secret: b"test_jwt_secret_32_bytes_minimum!".to_vec(),
            moderation_function_url: None,
            geocoding_url: "http://127.0.0.1:9".to_string(),
            geocoding_user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
