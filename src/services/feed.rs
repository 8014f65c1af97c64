// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed filter construction and evaluation.
//!
//! [`FeedFilterState`] holds what the user picked in the filter sheet.
//! [`FeedFilterState::build_query`] normalizes that into a [`FeedQuery`],
//! which the data-fetch layer either sends upstream or applies in memory.

use crate::models::{
    Coordinate, FeedItem, MediaType, NamedLocation, RiderType, MAX_KICKOUT_RISK, MIN_KICKOUT_RISK,
};
use crate::services::distance::haversine_distance;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Radius used when a center is set but no max distance was chosen.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw filter selections from the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FeedFilterState {
    #[validate(length(max = 64))]
    pub author: Option<String>,
    #[validate(nested)]
    pub location: Option<NamedLocation>,
    pub near_me: bool,
    #[validate(range(exclusive_min = 0.0, max = 20_000.0))]
    pub max_distance_km: Option<f64>,
    #[validate(range(min = MIN_KICKOUT_RISK, max = MAX_KICKOUT_RISK))]
    pub max_risk: Option<u8>,
    pub rider_types: BTreeSet<RiderType>,
    pub media_types: BTreeSet<MediaType>,
}

impl FeedFilterState {
    /// Toggle "near me". Turning it on drops any named location.
    pub fn set_near_me(&mut self, enabled: bool) {
        self.near_me = enabled;
        if enabled {
            self.location = None;
        }
    }

    /// Select a named location. This turns "near me" off.
    pub fn select_location(&mut self, location: NamedLocation) {
        self.location = Some(location);
        self.near_me = false;
    }

    pub fn clear_location(&mut self) {
        self.location = None;
    }

    /// Restore the near-me/location exclusivity on state that came off the
    /// wire. A stored location wins over a stale near-me flag.
    pub fn normalized(mut self) -> Self {
        if self.near_me && self.location.is_some() {
            self.near_me = false;
        }
        self
    }

    /// Build the normalized query descriptor.
    ///
    /// `user_location` is the live device position, only consulted when
    /// "near me" is active.
    pub fn build_query(&self, user_location: Option<Coordinate>, page: PageRequest) -> FeedQuery {
        let center = if self.near_me {
            if user_location.is_none() {
                tracing::warn!("Near-me filter active without a user location; ignoring radius");
            }
            user_location
        } else {
            self.location.as_ref().map(|l| l.coordinate)
        };

        let radius_m = center.map(|_| self.max_distance_km.unwrap_or(DEFAULT_RADIUS_KM) * 1000.0);

        FeedQuery {
            author: self.author.clone().filter(|a| !a.is_empty()),
            center,
            radius_m,
            max_risk: self.max_risk,
            rider_types: self.rider_types.clone(),
            media_types: self.media_types.clone(),
            limit: page.limit.clamp(1, MAX_PAGE_SIZE),
            cursor: page.cursor,
        }
    }
}

/// Pagination input for a feed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub limit: u32,
    pub cursor: Option<FeedCursor>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }
}

/// Normalized filter descriptor consumed by the data-fetch layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedQuery {
    pub author: Option<String>,
    pub center: Option<Coordinate>,
    pub radius_m: Option<f64>,
    pub max_risk: Option<u8>,
    /// Empty means any rider type
    pub rider_types: BTreeSet<RiderType>,
    /// Empty means any media type
    pub media_types: BTreeSet<MediaType>,
    pub limit: u32,
    #[serde(skip)]
    pub cursor: Option<FeedCursor>,
}

impl FeedQuery {
    /// Whether a feed item passes every active filter.
    pub fn matches(&self, item: &FeedItem) -> bool {
        if let Some(author) = &self.author {
            if &item.media.author_id != author {
                return false;
            }
        }

        if let (Some(center), Some(radius_m)) = (self.center, self.radius_m) {
            let location = item.spot.as_ref().and_then(|s| s.location);
            match location {
                Some(loc) if haversine_distance(center, loc) <= radius_m => {}
                _ => return false,
            }
        }

        if let Some(max_risk) = self.max_risk {
            match &item.spot {
                Some(spot) if spot.kickout_risk <= max_risk => {}
                _ => return false,
            }
        }

        if !self.rider_types.is_empty()
            && !item
                .author_rider_type
                .is_some_and(|r| self.rider_types.contains(&r))
        {
            return false;
        }

        if !self.media_types.is_empty() && !self.media_types.contains(&item.media.media_type) {
            return false;
        }

        true
    }

    /// Filter, sort newest first and paginate a candidate list.
    pub fn apply(&self, items: Vec<FeedItem>) -> FeedPage {
        let mut matching: Vec<FeedItem> = items.into_iter().filter(|i| self.matches(i)).collect();
        matching.sort_by(|a, b| {
            b.media
                .created_at
                .cmp(&a.media.created_at)
                .then_with(|| b.media.id.cmp(&a.media.id))
        });

        if let Some(cursor) = &self.cursor {
            matching.retain(|i| cursor.is_before(&i.media.created_at, &i.media.id));
        }

        let limit = self.limit as usize;
        let has_more = matching.len() > limit;
        matching.truncate(limit);

        let next_cursor = if has_more {
            matching.last().map(|i| {
                FeedCursor {
                    created_at: i.media.created_at,
                    media_id: i.media.id.clone(),
                }
                .encode()
            })
        } else {
            None
        };

        tracing::debug!(
            returned = matching.len(),
            has_more,
            "Applied feed filters"
        );

        FeedPage {
            items: matching,
            next_cursor,
        }
    }
}

/// One page of feed results.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub next_cursor: Option<String>,
}

/// Position of the last item on the previous page.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCursor {
    pub created_at: DateTime<Utc>,
    pub media_id: String,
}

const CURSOR_PARTS: usize = 3;

impl FeedCursor {
    pub fn encode(&self) -> String {
        let payload = format!(
            "{}:{}:{}",
            self.created_at.timestamp(),
            self.created_at.timestamp_subsec_nanos(),
            self.media_id
        );
        URL_SAFE_NO_PAD.encode(payload)
    }

    pub fn decode(raw: &str) -> Result<Self, CursorError> {
        let decoded = URL_SAFE_NO_PAD
            .decode(raw)
            .map_err(|_| CursorError::Invalid)?;
        let decoded = std::str::from_utf8(&decoded).map_err(|_| CursorError::Invalid)?;

        let parts: Vec<&str> = decoded.splitn(CURSOR_PARTS, ':').collect();
        if parts.len() != CURSOR_PARTS || parts[2].is_empty() {
            return Err(CursorError::Invalid);
        }

        let seconds = parts[0].parse::<i64>().map_err(|_| CursorError::Invalid)?;
        let nanos = parts[1].parse::<u32>().map_err(|_| CursorError::Invalid)?;
        let created_at = DateTime::from_timestamp(seconds, nanos).ok_or(CursorError::Invalid)?;

        Ok(Self {
            created_at,
            media_id: parts[2].to_string(),
        })
    }

    /// Whether an item sorts strictly after this cursor in newest-first order.
    fn is_before(&self, created_at: &DateTime<Utc>, id: &str) -> bool {
        (created_at, id) < (&self.created_at, self.media_id.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("Invalid feed cursor")]
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(name: &str, lat: f64, lng: f64) -> NamedLocation {
        NamedLocation {
            name: name.to_string(),
            coordinate: Coordinate::new(lat, lng),
        }
    }

    #[test]
    fn test_near_me_clears_named_location() {
        let mut state = FeedFilterState::default();
        state.select_location(location("Barcelona", 41.39, 2.17));
        state.set_near_me(true);

        assert!(state.near_me);
        assert!(state.location.is_none());
    }

    #[test]
    fn test_named_location_clears_near_me() {
        let mut state = FeedFilterState::default();
        state.set_near_me(true);
        state.select_location(location("Barcelona", 41.39, 2.17));

        assert!(!state.near_me);
        assert_eq!(state.location.as_ref().unwrap().name, "Barcelona");
    }

    #[test]
    fn test_turning_near_me_off_keeps_location_cleared() {
        let mut state = FeedFilterState::default();
        state.select_location(location("Barcelona", 41.39, 2.17));
        state.set_near_me(true);
        state.set_near_me(false);
        assert!(state.location.is_none());
        assert!(!state.near_me);
    }

    #[test]
    fn test_normalized_prefers_location() {
        let state = FeedFilterState {
            near_me: true,
            location: Some(location("Malmö", 55.6, 13.0)),
            ..Default::default()
        }
        .normalized();
        assert!(!state.near_me);
        assert!(state.location.is_some());
    }

    #[test]
    fn test_center_selection() {
        let user = Coordinate::new(40.0, -74.0);

        let mut state = FeedFilterState::default();
        let q = state.build_query(Some(user), PageRequest::default());
        assert_eq!(q.center, None);
        assert_eq!(q.radius_m, None);

        state.set_near_me(true);
        state.max_distance_km = Some(10.0);
        let q = state.build_query(Some(user), PageRequest::default());
        assert_eq!(q.center, Some(user));
        assert_eq!(q.radius_m, Some(10_000.0));

        let q = state.build_query(None, PageRequest::default());
        assert_eq!(q.center, None);
        assert_eq!(q.radius_m, None);

        state.select_location(location("Malmö", 55.6, 13.0));
        state.max_distance_km = None;
        let q = state.build_query(Some(user), PageRequest::default());
        assert_eq!(q.center, Some(Coordinate::new(55.6, 13.0)));
        assert_eq!(q.radius_m, Some(DEFAULT_RADIUS_KM * 1000.0));
    }

    #[test]
    fn test_limit_is_clamped() {
        let state = FeedFilterState::default();
        let q = state.build_query(
            None,
            PageRequest {
                limit: 10_000,
                cursor: None,
            },
        );
        assert_eq!(q.limit, MAX_PAGE_SIZE);

        let q = state.build_query(
            None,
            PageRequest {
                limit: 0,
                cursor: None,
            },
        );
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn test_cursor_round_trip() {
        let cursor = FeedCursor {
            created_at: DateTime::from_timestamp(1_704_103_200, 123).unwrap(),
            media_id: "a1b2:c3".to_string(),
        };
        let decoded = FeedCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        assert!(FeedCursor::decode("not-base64!!").is_err());
        assert!(FeedCursor::decode(&URL_SAFE_NO_PAD.encode("12:0")).is_err());
        assert!(FeedCursor::decode(&URL_SAFE_NO_PAD.encode("x:0:id")).is_err());
    }
}
