// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Skate spot model.

use crate::models::location::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lowest and highest kickout risk a spot can carry.
pub const MIN_KICKOUT_RISK: u8 = 1;
pub const MAX_KICKOUT_RISK: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// Obstacle tag attached to a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum SpotType {
    Rail,
    Ledge,
    Gap,
    Stairs,
    Bank,
    Bowl,
    ManualPad,
    Transition,
    Park,
    Diy,
    #[serde(other)]
    Other,
}

impl SpotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotType::Rail => "rail",
            SpotType::Ledge => "ledge",
            SpotType::Gap => "gap",
            SpotType::Stairs => "stairs",
            SpotType::Bank => "bank",
            SpotType::Bowl => "bowl",
            SpotType::ManualPad => "manual_pad",
            SpotType::Transition => "transition",
            SpotType::Park => "park",
            SpotType::Diy => "diy",
            SpotType::Other => "other",
        }
    }
}

/// A user-submitted skate spot, as returned by the data service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Spot {
    pub id: String,
    pub name: String,
    /// Missing when the submitter never pinned the spot on the map
    #[validate(nested)]
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub is_lit: bool,
    #[validate(range(min = MIN_KICKOUT_RISK, max = MAX_KICKOUT_RISK))]
    pub kickout_risk: u8,
    #[serde(default)]
    pub spot_types: Vec<SpotType>,
    /// User ID of the submitter
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Spot {
    /// Whether any of the spot's tags appear in `wanted`.
    pub fn has_any_type(&self, wanted: &[SpotType]) -> bool {
        self.spot_types.iter().any(|t| wanted.contains(t))
    }
}
