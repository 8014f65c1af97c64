// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contest eligibility filtering.
//!
//! Given a contest and the competitor's spots and media, work out which
//! (spot, media) pairs can be submitted. Every predicate in the criteria
//! must pass; a missing or empty rule means no restriction.

use crate::models::contest::restriction;
use crate::models::{Contest, MediaItem, Spot};
use crate::services::distance::haversine_distance;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A submittable pairing of one of the user's spots with a media item.
#[derive(Debug, Clone, Serialize)]
pub struct EligibleEntry {
    pub spot: Spot,
    pub media: MediaItem,
}

/// Evaluates a contest's criteria for one competitor.
pub struct ContestEligibility<'a> {
    contest: &'a Contest,
    user_id: &'a str,
    now: DateTime<Utc>,
}

impl<'a> ContestEligibility<'a> {
    pub fn new(contest: &'a Contest, user_id: &'a str, now: DateTime<Utc>) -> Self {
        Self {
            contest,
            user_id,
            now,
        }
    }

    /// Spot-level predicates: age, type, difficulty, lighting, risk,
    /// mandated spot, geographic radius and creator.
    pub fn spot_is_eligible(&self, spot: &Spot) -> bool {
        let criteria = &self.contest.criteria;

        if !criteria
            .spot_age
            .admits(spot.created_at, self.contest.start_date, self.now)
        {
            return false;
        }

        if let Some(allowed) = restriction(&criteria.allowed_spot_types) {
            if !spot.has_any_type(allowed) {
                return false;
            }
        }

        if let Some(allowed) = restriction(&criteria.allowed_difficulties) {
            if !allowed.contains(&spot.difficulty) {
                return false;
            }
        }

        if criteria.is_lit_required.is_some_and(|lit| lit != spot.is_lit) {
            return false;
        }

        if criteria
            .max_kickout_risk
            .is_some_and(|max| spot.kickout_risk > max)
        {
            return false;
        }

        if let Some(required) = &criteria.specific_spot_id {
            if required != &spot.id {
                return false;
            }
        }

        if let Some(area) = &criteria.location {
            // Spots that were never pinned cannot prove they are inside the area
            let Some(location) = spot.location else {
                return false;
            };
            if haversine_distance(area.center, location) > area.radius_km * 1000.0 {
                return false;
            }
        }

        if criteria.spot_must_be_created_by_competitor && spot.created_by != self.user_id {
            return false;
        }

        true
    }

    /// Media-level predicates: type and age.
    pub fn media_is_eligible(&self, media: &MediaItem) -> bool {
        let criteria = &self.contest.criteria;
        criteria.media_types().contains(&media.media_type)
            && criteria
                .media_age
                .admits(media.created_at, self.contest.start_date, self.now)
    }

    /// All eligible (spot, media) pairs.
    ///
    /// Candidate spots are the user's created spots followed by favorites,
    /// de-duplicated by ID. Media whose spot is not a candidate is ignored.
    pub fn evaluate(
        &self,
        created_spots: &[Spot],
        favorite_spots: &[Spot],
        media: &[MediaItem],
    ) -> Vec<EligibleEntry> {
        let mut seen = HashSet::new();
        let eligible_spots: HashMap<&str, &Spot> = created_spots
            .iter()
            .chain(favorite_spots)
            .filter(|s| seen.insert(s.id.as_str()))
            .filter(|s| self.spot_is_eligible(s))
            .map(|s| (s.id.as_str(), s))
            .collect();

        let entries: Vec<EligibleEntry> = media
            .iter()
            .filter(|m| self.media_is_eligible(m))
            .filter_map(|m| {
                eligible_spots
                    .get(m.spot_id.as_str())
                    .map(|s| EligibleEntry {
                        spot: (*s).clone(),
                        media: m.clone(),
                    })
            })
            .collect();

        tracing::debug!(
            contest_id = %self.contest.id,
            user_id = %self.user_id,
            candidate_spots = seen.len(),
            eligible_spots = eligible_spots.len(),
            eligible_entries = entries.len(),
            "Evaluated contest eligibility"
        );

        entries
    }
}
