// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use spothop::config::Config;
use spothop::models::{Coordinate, Difficulty, MediaItem, MediaType, Spot, SpotType};
use spothop::routes::create_router;
use spothop::AppState;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_USER: &str = "2b4f7c1e-7a0d-4e39-9d54-0c6f1f3a9b11";
pub const OTHER_USER: &str = "9e1c2d3b-5f6a-4b7c-8d9e-0f1a2b3c4d5e";

/// Create a test app with offline dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_config(config));
    (create_router(state.clone()), state)
}

/// Create a session token shaped like the identity service's.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, secret: &[u8]) -> String {
    create_test_jwt_with_audience(user_id, "authenticated", secret)
}

#[allow(dead_code)]
pub fn create_test_jwt_with_audience(user_id: &str, audience: &str, secret: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: usize,
        iat: usize,
        aud: &'a str,
        role: &'a str,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id,
        exp: now + 3600,
        iat: now,
        aud: audience,
        role: "authenticated",
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// A lit, intermediate ledge spot in San Francisco created by `TEST_USER`.
#[allow(dead_code)]
pub fn make_spot(id: &str) -> Spot {
    Spot {
        id: id.to_string(),
        name: format!("Spot {id}"),
        location: Some(Coordinate::new(37.7749, -122.4194)),
        street: Some("1 Market St".to_string()),
        city: Some("San Francisco".to_string()),
        state: Some("CA".to_string()),
        country: Some("USA".to_string()),
        postal_code: None,
        difficulty: Difficulty::Intermediate,
        is_lit: true,
        kickout_risk: 4,
        spot_types: vec![SpotType::Ledge],
        created_by: TEST_USER.to_string(),
        created_at: ts("2025-06-10T12:00:00Z"),
    }
}

#[allow(dead_code)]
pub fn make_media(id: &str, spot_id: &str, media_type: MediaType) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        media_type,
        url: format!("https://cdn.example.com/media/{id}"),
        thumbnail_url: match media_type {
            MediaType::Video => Some(format!("https://cdn.example.com/thumbs/{id}.jpg")),
            MediaType::Photo => None,
        },
        author_id: TEST_USER.to_string(),
        like_count: 0,
        created_at: ts("2025-06-15T12:00:00Z"),
        spot_id: spot_id.to_string(),
    }
}
