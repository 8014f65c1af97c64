// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map viewport queries over spots.
//!
//! A [`SpotQuery`] is built from the visible map bounds plus optional
//! attribute filters. It can be evaluated in memory against a candidate list
//! or rendered as PostgREST filter parameters for the data service.

use crate::models::{Difficulty, MapBounds, Spot, SpotType};
use geo::{coord, Intersects, Point, Rect};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

/// Bounding-box query with optional attribute filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotQuery {
    pub bounds: MapBounds,
    pub difficulty: Option<Difficulty>,
    pub lit: Option<bool>,
    pub max_kickout_risk: Option<u8>,
    /// Matches spots carrying at least one of these tags
    pub spot_types: Vec<SpotType>,
}

impl SpotQuery {
    pub fn from_bounds(bounds: MapBounds) -> Self {
        Self {
            bounds,
            difficulty: None,
            lit: None,
            max_kickout_risk: None,
            spot_types: Vec::new(),
        }
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn lit(mut self, lit: bool) -> Self {
        self.lit = Some(lit);
        self
    }

    pub fn max_kickout_risk(mut self, max: u8) -> Self {
        self.max_kickout_risk = Some(max);
        self
    }

    pub fn spot_types<I: IntoIterator<Item = SpotType>>(mut self, types: I) -> Self {
        self.spot_types = types.into_iter().collect();
        self.spot_types.sort();
        self.spot_types.dedup();
        self
    }

    /// Viewport rectangles in (lng, lat) space. Two when crossing the antimeridian.
    fn rects(&self) -> Vec<Rect<f64>> {
        let b = &self.bounds;
        if b.crosses_antimeridian() {
            vec![
                Rect::new(coord! { x: b.west, y: b.south }, coord! { x: 180.0, y: b.north }),
                Rect::new(coord! { x: -180.0, y: b.south }, coord! { x: b.east, y: b.north }),
            ]
        } else {
            vec![Rect::new(
                coord! { x: b.west, y: b.south },
                coord! { x: b.east, y: b.north },
            )]
        }
    }

    /// Evaluate the query against a single spot.
    pub fn matches(&self, spot: &Spot) -> bool {
        let Some(location) = spot.location else {
            return false;
        };
        let point: Point<f64> = location.into();
        if !self.rects().iter().any(|r| point.intersects(r)) {
            return false;
        }

        if self.difficulty.is_some_and(|d| d != spot.difficulty) {
            return false;
        }
        if self.lit.is_some_and(|lit| lit != spot.is_lit) {
            return false;
        }
        if self.max_kickout_risk.is_some_and(|max| spot.kickout_risk > max) {
            return false;
        }
        if !self.spot_types.is_empty() && !spot.has_any_type(&self.spot_types) {
            return false;
        }
        true
    }

    /// Keep only the spots matching this query.
    pub fn apply<'a, I>(&self, spots: I) -> Vec<&'a Spot>
    where
        I: IntoIterator<Item = &'a Spot>,
    {
        spots.into_iter().filter(|s| self.matches(s)).collect()
    }

    /// Render as PostgREST query parameters for the `spots` table.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let b = &self.bounds;
        let mut pairs = vec![
            ("lat".to_string(), format!("gte.{}", b.south)),
            ("lat".to_string(), format!("lte.{}", b.north)),
        ];

        if b.crosses_antimeridian() {
            pairs.push((
                "or".to_string(),
                format!("(lng.gte.{},lng.lte.{})", b.west, b.east),
            ));
        } else {
            pairs.push(("lng".to_string(), format!("gte.{}", b.west)));
            pairs.push(("lng".to_string(), format!("lte.{}", b.east)));
        }

        if let Some(difficulty) = self.difficulty {
            pairs.push(("difficulty".to_string(), format!("eq.{}", difficulty.as_str())));
        }
        if let Some(lit) = self.lit {
            pairs.push(("is_lit".to_string(), format!("eq.{lit}")));
        }
        if let Some(max) = self.max_kickout_risk {
            pairs.push(("kickout_risk".to_string(), format!("lte.{max}")));
        }
        if !self.spot_types.is_empty() {
            let tags: Vec<&str> = self.spot_types.iter().map(SpotType::as_str).collect();
            pairs.push(("spot_type".to_string(), format!("ov.{{{}}}", tags.join(","))));
        }

        pairs
    }
}

/// Render spots as a GeoJSON feature collection for the map layer.
///
/// Spots without a coordinate are skipped.
pub fn spots_to_feature_collection<'a, I>(spots: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a Spot>,
{
    let features = spots
        .into_iter()
        .filter_map(|spot| {
            let location = spot.location?;
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), spot.name.clone().into());
            properties.insert("difficulty".to_string(), spot.difficulty.as_str().into());
            properties.insert("is_lit".to_string(), spot.is_lit.into());
            properties.insert("kickout_risk".to_string(), spot.kickout_risk.into());
            properties.insert(
                "spot_types".to_string(),
                spot.spot_types
                    .iter()
                    .map(|t| serde_json::Value::from(t.as_str()))
                    .collect::<Vec<_>>()
                    .into(),
            );

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![location.lng, location.lat]))),
                id: Some(geojson::feature::Id::String(spot.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
