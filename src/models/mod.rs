// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod contest;
pub mod location;
pub mod media;
pub mod spot;
pub mod user;

pub use contest::{Contest, ContestCriteria, GeoRestriction, TimeWindow};
pub use location::{Address, Coordinate, MapBounds, NamedLocation};
pub use media::{FeedItem, MediaItem, MediaType};
pub use spot::{Difficulty, Spot, SpotType, MAX_KICKOUT_RISK, MIN_KICKOUT_RISK};
pub use user::RiderType;
