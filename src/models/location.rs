// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geographic primitives shared by spots, feeds and contests.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lng, c.lat)
    }
}

/// A place the user picked from geocoding results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NamedLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(nested)]
    pub coordinate: Coordinate,
}

/// Visible map viewport.
///
/// `west > east` means the viewport crosses the antimeridian. The latitude
/// edges never wrap, so `south` must not be above `north`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_latitude_order"))]
pub struct MapBounds {
    #[validate(range(min = -90.0, max = 90.0))]
    pub north: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub south: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub east: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub west: f64,
}

impl MapBounds {
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }
}

fn validate_latitude_order(bounds: &MapBounds) -> Result<(), ValidationError> {
    if bounds.south > bounds.north {
        return Err(ValidationError::new("south_above_north"));
    }
    Ok(())
}

/// Human-readable address returned by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}
