// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Forward/reverse geocoding against a Nominatim-compatible API.

use crate::error::AppError;
use crate::models::{Address, Coordinate, NamedLocation};
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;

/// Reverse lookups are cached at ~11 m resolution.
const CACHE_PRECISION: f64 = 10_000.0;
pub const MAX_SEARCH_RESULTS: u32 = 10;
/// Upper bound on cached reverse lookups. Past it, new points go uncached.
pub const MAX_CACHED_ADDRESSES: usize = 10_000;

/// Cache key: coordinate rounded to 4 decimal places, scaled to integers.
type CacheKey = (i64, i64);

/// Shared cache of reverse geocoding results.
pub type ReverseCache = Arc<DashMap<CacheKey, Option<Address>>>;

#[derive(Clone)]
pub struct GeocodingService {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
    cache: ReverseCache,
}

impl GeocodingService {
    pub fn new(base_url: String, user_agent: String, cache: ReverseCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            user_agent,
            cache,
        }
    }

    /// Search for places by free-form text.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<NamedLocation>, AppError> {
        let url = format!("{}/search", self.base_url);
        let limit = limit.clamp(1, MAX_SEARCH_RESULTS);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("q", query.to_string()),
                ("format", "jsonv2".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Geocoding(e.to_string()))?;

        let places: Vec<NominatimPlace> = check_response_json(response).await?;
        Ok(places.into_iter().filter_map(NominatimPlace::into_location).collect())
    }

    /// Address for a coordinate, if the geocoder knows one.
    pub async fn reverse(&self, coordinate: Coordinate) -> Result<Option<Address>, AppError> {
        let key = cache_key(coordinate);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(lat = coordinate.lat, lng = coordinate.lng, "Reverse geocode cache hit");
            return Ok(cached.value().clone());
        }

        let url = format!("{}/reverse", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("lat", coordinate.lat.to_string()),
                ("lon", coordinate.lng.to_string()),
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Geocoding(e.to_string()))?;

        let reverse: NominatimReverse = check_response_json(response).await?;
        let address = reverse.into_address();

        self.remember(key, address.clone());
        Ok(address)
    }

    fn remember(&self, key: CacheKey, address: Option<Address>) {
        if self.cache.len() >= MAX_CACHED_ADDRESSES && !self.cache.contains_key(&key) {
            tracing::debug!(entries = self.cache.len(), "Reverse geocode cache full");
            return;
        }
        self.cache.insert(key, address);
    }
}

fn cache_key(c: Coordinate) -> CacheKey {
    (
        (c.lat * CACHE_PRECISION).round() as i64,
        (c.lng * CACHE_PRECISION).round() as i64,
    )
}

async fn check_response_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Geocoding(format!("Geocoder returned {status}")));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::Geocoding(format!("Invalid geocoder response: {e}")))
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn into_location(self) -> Option<NamedLocation> {
        let lat = self.lat.parse().ok()?;
        let lng = self.lon.parse().ok()?;
        Some(NamedLocation {
            name: self.display_name,
            coordinate: Coordinate::new(lat, lng),
        })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    /// Present when the geocoder found nothing at this point
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
}

impl NominatimReverse {
    fn into_address(self) -> Option<Address> {
        if self.error.is_some() {
            return None;
        }
        let display_name = self.display_name?;
        let a = self.address.unwrap_or_default();

        let street = match (a.house_number, a.road) {
            (Some(number), Some(road)) => Some(format!("{number} {road}")),
            (None, road) => road,
            (Some(_), None) => None,
        };

        Some(Address {
            display_name,
            street,
            city: a.city.or(a.town).or(a.village),
            state: a.state,
            country: a.country,
            postal_code: a.postcode,
        })
    }
}
