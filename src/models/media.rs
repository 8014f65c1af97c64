// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo/video uploads attached to spots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{RiderType, Spot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Photo,
    Video,
}

/// Stored media record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub media_type: MediaType,
    /// Public storage URL
    pub url: String,
    /// Poster frame (videos only)
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub author_id: String,
    #[serde(default)]
    pub like_count: u32,
    pub created_at: DateTime<Utc>,
    /// Parent spot
    pub spot_id: String,
}

/// A media item joined with its spot and the author's rider type.
///
/// This is the row shape the feed filter works on.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedItem {
    pub media: MediaItem,
    #[serde(default)]
    #[validate(nested)]
    pub spot: Option<Spot>,
    #[serde(default)]
    pub author_rider_type: Option<RiderType>,
}
