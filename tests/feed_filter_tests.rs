// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed filter tests: center selection, predicates, ordering and pagination.

use spothop::models::{Coordinate, FeedItem, MediaType, NamedLocation, RiderType};
use spothop::services::{FeedCursor, FeedFilterState, PageRequest};

mod common;
use common::{make_media, make_spot, ts, OTHER_USER, TEST_USER};

/// A feed item for a spot at `(lat, lng)` posted at `created_at`.
fn item(id: &str, lat: f64, lng: f64, created_at: &str) -> FeedItem {
    let mut spot = make_spot(&format!("spot-{id}"));
    spot.location = Some(Coordinate::new(lat, lng));
    let mut media = make_media(id, &spot.id, MediaType::Video);
    media.created_at = ts(created_at);
    FeedItem {
        media,
        spot: Some(spot),
        author_rider_type: Some(RiderType::Skateboard),
    }
}

fn ids(items: &[FeedItem]) -> Vec<&str> {
    items.iter().map(|i| i.media.id.as_str()).collect()
}

fn sf_location() -> NamedLocation {
    NamedLocation {
        name: "San Francisco".to_string(),
        coordinate: Coordinate::new(37.7749, -122.4194),
    }
}

#[test]
fn test_no_filters_returns_everything_newest_first() {
    let items = vec![
        item("a", 37.77, -122.42, "2025-06-01T00:00:00Z"),
        item("b", 40.71, -74.00, "2025-06-03T00:00:00Z"),
        item("c", 51.50, -0.12, "2025-06-02T00:00:00Z"),
    ];

    let page = FeedFilterState::default()
        .build_query(None, PageRequest::default())
        .apply(items);

    assert_eq!(ids(&page.items), vec!["b", "c", "a"]);
    assert!(page.next_cursor.is_none());
}

#[test]
fn test_named_location_radius() {
    let items = vec![
        item("sf", 37.78, -122.41, "2025-06-01T00:00:00Z"),
        item("oakland", 37.8044, -122.2712, "2025-06-02T00:00:00Z"),
        item("nyc", 40.71, -74.00, "2025-06-03T00:00:00Z"),
    ];

    let mut state = FeedFilterState::default();
    state.select_location(sf_location());
    state.max_distance_km = Some(5.0);
    let page = state.build_query(None, PageRequest::default()).apply(items.clone());
    assert_eq!(ids(&page.items), vec!["sf"]);

    state.max_distance_km = Some(20.0);
    let page = state.build_query(None, PageRequest::default()).apply(items);
    assert_eq!(ids(&page.items), vec!["oakland", "sf"]);
}

#[test]
fn test_clearing_location_removes_radius() {
    let items = vec![
        item("sf", 37.78, -122.41, "2025-06-01T00:00:00Z"),
        item("nyc", 40.71, -74.00, "2025-06-03T00:00:00Z"),
    ];

    let mut state = FeedFilterState::default();
    state.select_location(sf_location());
    state.max_distance_km = Some(5.0);
    let page = state.build_query(None, PageRequest::default()).apply(items.clone());
    assert_eq!(ids(&page.items), vec!["sf"]);

    state.clear_location();
    assert!(state.location.is_none());
    assert!(!state.near_me);
    let page = state.build_query(None, PageRequest::default()).apply(items);
    assert_eq!(ids(&page.items), vec!["nyc", "sf"]);
}

#[test]
fn test_near_me_uses_live_location_not_named_location() {
    let items = vec![
        item("sf", 37.78, -122.41, "2025-06-01T00:00:00Z"),
        item("nyc", 40.71, -74.00, "2025-06-03T00:00:00Z"),
    ];

    let mut state = FeedFilterState::default();
    state.select_location(sf_location());
    state.set_near_me(true);
    state.max_distance_km = Some(10.0);

    let user_in_nyc = Coordinate::new(40.72, -74.01);
    let page = state
        .build_query(Some(user_in_nyc), PageRequest::default())
        .apply(items);
    assert_eq!(ids(&page.items), vec!["nyc"]);
}

#[test]
fn test_items_without_spot_location_fail_radius() {
    let mut no_location = item("x", 0.0, 0.0, "2025-06-01T00:00:00Z");
    no_location.spot.as_mut().unwrap().location = None;
    let mut no_spot = item("y", 0.0, 0.0, "2025-06-01T00:00:00Z");
    no_spot.spot = None;

    let mut state = FeedFilterState::default();
    state.select_location(sf_location());
    let query = state.build_query(None, PageRequest::default());

    assert!(!query.matches(&no_location));
    assert!(!query.matches(&no_spot));
}

#[test]
fn test_author_risk_rider_and_media_filters() {
    let base = item("a", 37.77, -122.42, "2025-06-01T00:00:00Z");

    let mut by_other = base.clone();
    by_other.media.author_id = OTHER_USER.to_string();

    let mut risky = base.clone();
    risky.spot.as_mut().unwrap().kickout_risk = 9;

    let mut bmx = base.clone();
    bmx.author_rider_type = Some(RiderType::Bmx);

    let mut unknown_rider = base.clone();
    unknown_rider.author_rider_type = None;

    let mut photo = base.clone();
    photo.media.media_type = MediaType::Photo;

    let state = FeedFilterState {
        author: Some(TEST_USER.to_string()),
        max_risk: Some(5),
        rider_types: [RiderType::Skateboard].into_iter().collect(),
        media_types: [MediaType::Video].into_iter().collect(),
        ..Default::default()
    };
    let query = state.build_query(None, PageRequest::default());

    assert!(query.matches(&base));
    assert!(!query.matches(&by_other));
    assert!(!query.matches(&risky));
    assert!(!query.matches(&bmx));
    assert!(!query.matches(&unknown_rider));
    assert!(!query.matches(&photo));
}

#[test]
fn test_empty_author_is_ignored() {
    let state = FeedFilterState {
        author: Some(String::new()),
        ..Default::default()
    };
    let query = state.build_query(None, PageRequest::default());
    assert!(query.author.is_none());
}

#[test]
fn test_cursor_pagination_walks_all_items() {
    let items: Vec<FeedItem> = (0..7)
        .map(|n| {
            item(
                &format!("m{n}"),
                37.77,
                -122.42,
                // Two items share each timestamp to exercise the id tiebreak
                &format!("2025-06-0{}T00:00:00Z", 1 + n / 2),
            )
        })
        .collect();

    let state = FeedFilterState::default();
    let mut cursor = None;
    let mut seen = Vec::new();
    let mut pages = 0;

    loop {
        let page = state
            .build_query(None, PageRequest { limit: 3, cursor })
            .apply(items.clone());
        pages += 1;
        seen.extend(page.items.iter().map(|i| i.media.id.clone()));
        match page.next_cursor {
            Some(raw) => cursor = Some(FeedCursor::decode(&raw).unwrap()),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, vec!["m6", "m5", "m4", "m3", "m2", "m1", "m0"]);
}
