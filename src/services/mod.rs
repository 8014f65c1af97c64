// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod backend;
pub mod contest;
pub mod distance;
pub mod feed;
pub mod geocoding;
pub mod moderation;
pub mod spot_query;
pub mod username;

pub use backend::BackendClient;
pub use contest::{ContestEligibility, EligibleEntry};
pub use distance::haversine_distance;
pub use feed::{FeedCursor, FeedFilterState, FeedPage, FeedQuery, PageRequest};
pub use geocoding::GeocodingService;
pub use moderation::{ModerationService, ModerationVerdict};
pub use spot_query::{spots_to_feature_collection, SpotQuery};
pub use username::{validate_username, UsernameError};
