// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community contests and their entry rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{
    Coordinate, Difficulty, MediaType, RiderType, SpotType, MAX_KICKOUT_RISK, MIN_KICKOUT_RISK,
};

/// How recent a spot or media item must be to count for a contest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    DuringCompetition,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_60_days")]
    Last60Days,
    #[serde(rename = "last_90_days")]
    Last90Days,
    #[default]
    Anytime,
}

impl TimeWindow {
    /// Earliest creation time that satisfies the window, or `None` if unbounded.
    pub fn earliest(
        &self,
        contest_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            TimeWindow::DuringCompetition => Some(contest_start),
            TimeWindow::Last30Days => Some(now - Duration::days(30)),
            TimeWindow::Last60Days => Some(now - Duration::days(60)),
            TimeWindow::Last90Days => Some(now - Duration::days(90)),
            TimeWindow::Anytime => None,
        }
    }

    pub fn admits(
        &self,
        created_at: DateTime<Utc>,
        contest_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        self.earliest(contest_start, now)
            .is_none_or(|earliest| created_at >= earliest)
    }
}

/// Spots must lie within `radius_km` of `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoRestriction {
    #[validate(nested)]
    pub center: Coordinate,
    #[validate(range(exclusive_min = 0.0))]
    pub radius_km: f64,
}

/// Eligibility rules attached to a contest.
///
/// A `None` or empty list means the attribute is unrestricted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContestCriteria {
    pub allowed_rider_types: Option<Vec<RiderType>>,
    /// Defaults to video only
    pub required_media_types: Option<Vec<MediaType>>,
    pub allowed_spot_types: Option<Vec<SpotType>>,
    pub allowed_difficulties: Option<Vec<Difficulty>>,
    #[validate(range(min = MIN_KICKOUT_RISK, max = MAX_KICKOUT_RISK))]
    pub max_kickout_risk: Option<u8>,
    pub is_lit_required: Option<bool>,
    #[validate(nested)]
    pub location: Option<GeoRestriction>,
    pub specific_spot_id: Option<String>,
    pub spot_must_be_created_by_competitor: bool,
    pub spot_age: TimeWindow,
    pub media_age: TimeWindow,
}

impl ContestCriteria {
    /// Media types an entry may use.
    pub fn media_types(&self) -> &[MediaType] {
        match self.required_media_types.as_deref() {
            Some(types) if !types.is_empty() => types,
            _ => &[MediaType::Video],
        }
    }

    /// Whether a competitor with this rider type may enter at all.
    pub fn allows_rider(&self, rider_type: Option<RiderType>) -> bool {
        match restriction(&self.allowed_rider_types) {
            None => true,
            Some(allowed) => rider_type.is_some_and(|r| allowed.contains(&r)),
        }
    }
}

/// Treat an empty allow-list the same as no allow-list.
pub(crate) fn restriction<T>(list: &Option<Vec<T>>) -> Option<&[T]> {
    list.as_deref().filter(|l| !l.is_empty())
}

/// A time-boxed community contest.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Contest {
    pub id: String,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    #[validate(nested)]
    pub criteria: ContestCriteria,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_time_window_thresholds() {
        let start = ts("2025-05-01T00:00:00Z");
        let now = ts("2025-06-30T00:00:00Z");

        assert_eq!(TimeWindow::DuringCompetition.earliest(start, now), Some(start));
        assert_eq!(
            TimeWindow::Last30Days.earliest(start, now),
            Some(ts("2025-05-31T00:00:00Z"))
        );
        assert_eq!(
            TimeWindow::Last90Days.earliest(start, now),
            Some(ts("2025-04-01T00:00:00Z"))
        );
        assert_eq!(TimeWindow::Anytime.earliest(start, now), None);
    }

    #[test]
    fn test_time_window_boundary_is_inclusive() {
        let start = ts("2025-05-01T00:00:00Z");
        let now = ts("2025-06-30T00:00:00Z");
        assert!(TimeWindow::DuringCompetition.admits(start, start, now));
        assert!(!TimeWindow::DuringCompetition.admits(ts("2025-04-30T23:59:59Z"), start, now));
        assert!(TimeWindow::Anytime.admits(ts("1999-01-01T00:00:00Z"), start, now));
    }

    #[test]
    fn test_criteria_wire_format() {
        let criteria: ContestCriteria = serde_json::from_str(
            r#"{
                "required_media_types": ["photo"],
                "allowed_difficulties": ["beginner"],
                "spot_age": "last_60_days",
                "media_age": "during_competition"
            }"#,
        )
        .unwrap();

        assert_eq!(criteria.media_types(), &[MediaType::Photo]);
        assert_eq!(criteria.spot_age, TimeWindow::Last60Days);
        assert_eq!(criteria.media_age, TimeWindow::DuringCompetition);
        assert!(criteria.location.is_none());
        assert!(!criteria.spot_must_be_created_by_competitor);
    }

    #[test]
    fn test_media_types_default_to_video() {
        let mut criteria = ContestCriteria::default();
        assert_eq!(criteria.media_types(), &[MediaType::Video]);

        criteria.required_media_types = Some(vec![]);
        assert_eq!(criteria.media_types(), &[MediaType::Video]);
    }

    #[test]
    fn test_allows_rider() {
        let mut criteria = ContestCriteria::default();
        assert!(criteria.allows_rider(None));

        criteria.allowed_rider_types = Some(vec![RiderType::Skateboard]);
        assert!(criteria.allows_rider(Some(RiderType::Skateboard)));
        assert!(!criteria.allows_rider(Some(RiderType::Bmx)));
        assert!(!criteria.allows_rider(None));
    }
}
