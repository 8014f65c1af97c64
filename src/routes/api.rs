// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for signed-in users.
//!
//! Clients fetch candidate rows from the data service themselves and post
//! them here together with the current filter state; these handlers return
//! the filtered, sorted result.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Address, Contest, Coordinate, Difficulty, FeedItem, MapBounds, MediaItem, MediaType,
    RiderType, Spot, SpotType, MAX_KICKOUT_RISK, MIN_KICKOUT_RISK,
};
use crate::services::{
    spots_to_feature_collection, ContestEligibility, EligibleEntry, FeedCursor, FeedFilterState,
    FeedPage, ModerationVerdict, PageRequest, SpotQuery,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// API routes (require a session).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/feed", post(get_feed))
        .route("/api/spots/query", post(query_spots))
        .route("/api/spots/{id}/flag", post(flag_spot))
        .route("/api/contests/eligibility", post(contest_eligibility))
        .route("/api/moderation/check", post(check_moderation))
        .route("/api/geocode/search", get(geocode_search))
        .route("/api/geocode/reverse", get(geocode_reverse))
}

// ─── Feed ────────────────────────────────────────────────────

fn default_limit() -> u32 {
    crate::services::feed::DEFAULT_PAGE_SIZE
}

#[derive(Deserialize, Validate)]
struct FeedRequest {
    #[serde(default)]
    #[validate(nested)]
    filters: FeedFilterState,
    /// Live device position, only used when "near me" is on
    #[validate(nested)]
    user_location: Option<Coordinate>,
    cursor: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    limit: u32,
    #[validate(length(max = 5000))]
    #[validate(nested)]
    items: Vec<FeedItem>,
}

/// Filter and paginate feed candidates.
async fn get_feed(
    Extension(user): Extension<AuthUser>,
    Json(req): Json<FeedRequest>,
) -> Result<Json<FeedPage>> {
    req.validate()?;

    let cursor = req
        .cursor
        .as_deref()
        .map(FeedCursor::decode)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let filters = req.filters.normalized();
    let query = filters.build_query(
        req.user_location,
        PageRequest {
            limit: req.limit,
            cursor,
        },
    );

    tracing::debug!(
        user_id = %user.user_id,
        candidates = req.items.len(),
        near_me = filters.near_me,
        has_center = query.center.is_some(),
        "Filtering feed"
    );

    Ok(Json(query.apply(req.items)))
}

// ─── Spots ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct SpotQueryRequest {
    #[validate(nested)]
    bounds: MapBounds,
    difficulty: Option<Difficulty>,
    lit: Option<bool>,
    #[validate(range(min = MIN_KICKOUT_RISK, max = MAX_KICKOUT_RISK))]
    max_kickout_risk: Option<u8>,
    #[serde(default)]
    spot_types: Vec<SpotType>,
    #[serde(default)]
    #[validate(length(max = 5000))]
    #[validate(nested)]
    spots: Vec<Spot>,
}

#[derive(Serialize)]
pub struct SpotQueryResponse {
    /// PostgREST filter parameters for fetching the next viewport
    pub query: Vec<(String, String)>,
    pub features: geojson::FeatureCollection,
}

/// Evaluate a map viewport query against candidate spots.
async fn query_spots(Json(req): Json<SpotQueryRequest>) -> Result<Json<SpotQueryResponse>> {
    req.validate()?;

    let mut query = SpotQuery::from_bounds(req.bounds).spot_types(req.spot_types);
    if let Some(difficulty) = req.difficulty {
        query = query.difficulty(difficulty);
    }
    if let Some(lit) = req.lit {
        query = query.lit(lit);
    }
    if let Some(max) = req.max_kickout_risk {
        query = query.max_kickout_risk(max);
    }

    let matching = query.apply(&req.spots);
    tracing::debug!(
        candidates = req.spots.len(),
        matching = matching.len(),
        "Evaluated spot query"
    );

    Ok(Json(SpotQueryResponse {
        query: query.to_query_pairs(),
        features: spots_to_feature_collection(matching),
    }))
}

#[derive(Deserialize, Validate)]
struct FlagRequest {
    #[validate(length(min = 1, max = 500))]
    reason: String,
}

#[derive(Serialize)]
pub struct FlagResponse {
    pub success: bool,
}

/// Report a spot. Reporting the same spot twice returns 409.
async fn flag_spot(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(spot_id): Path<String>,
    Json(req): Json<FlagRequest>,
) -> Result<Json<FlagResponse>> {
    req.validate()?;
    if spot_id.is_empty() || spot_id.len() > 64 {
        return Err(AppError::BadRequest("Invalid spot id".to_string()));
    }

    state
        .backend
        .flag_spot(&user.token, &user.user_id, &spot_id, req.reason.trim())
        .await?;

    Ok(Json(FlagResponse { success: true }))
}

// ─── Contests ────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct EligibilityRequest {
    #[validate(nested)]
    contest: Contest,
    rider_type: Option<RiderType>,
    #[serde(default)]
    #[validate(length(max = 5000))]
    #[validate(nested)]
    created_spots: Vec<Spot>,
    #[serde(default)]
    #[validate(length(max = 5000))]
    #[validate(nested)]
    favorite_spots: Vec<Spot>,
    #[serde(default)]
    #[validate(length(max = 5000))]
    media: Vec<MediaItem>,
    /// Evaluation time; defaults to the server clock
    now: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct EligibilityResponse {
    pub rider_allowed: bool,
    pub entries: Vec<EligibleEntry>,
}

/// List the competitor's (spot, media) pairs that can be submitted.
async fn contest_eligibility(
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EligibilityRequest>,
) -> Result<Json<EligibilityResponse>> {
    req.validate()?;

    let rider_allowed = req.contest.criteria.allows_rider(req.rider_type);
    if !rider_allowed {
        tracing::debug!(
            contest_id = %req.contest.id,
            rider_type = ?req.rider_type,
            "Rider type not allowed in contest"
        );
        return Ok(Json(EligibilityResponse {
            rider_allowed,
            entries: vec![],
        }));
    }

    let now = req.now.unwrap_or_else(Utc::now);
    let entries = ContestEligibility::new(&req.contest, &user.user_id, now).evaluate(
        &req.created_spots,
        &req.favorite_spots,
        &req.media,
    );

    Ok(Json(EligibilityResponse {
        rider_allowed,
        entries,
    }))
}

// ─── Moderation ──────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct ModerationRequest {
    #[validate(url)]
    media_url: String,
    media_type: MediaType,
}

/// Screen an uploaded file. Always answers; upstream failures count as safe.
async fn check_moderation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModerationRequest>,
) -> Result<Json<ModerationVerdict>> {
    req.validate()?;
    Ok(Json(
        state.moderation.check(&req.media_url, req.media_type).await,
    ))
}

// ─── Geocoding ───────────────────────────────────────────────

fn default_search_limit() -> u32 {
    5
}

#[derive(Deserialize, Validate)]
struct GeocodeSearchQuery {
    #[validate(length(min = 1, max = 200))]
    q: String,
    #[serde(default = "default_search_limit")]
    limit: u32,
}

async fn geocode_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeSearchQuery>,
) -> Result<Json<Vec<crate::models::NamedLocation>>> {
    params.validate()?;
    let places = state.geocoding.search(params.q.trim(), params.limit).await?;
    Ok(Json(places))
}

async fn geocode_reverse(
    State(state): State<Arc<AppState>>,
    Query(coordinate): Query<Coordinate>,
) -> Result<Json<Address>> {
    coordinate.validate()?;
    state
        .geocoding
        .reverse(coordinate)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No address at this location".to_string()))
}
