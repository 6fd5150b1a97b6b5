use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    cache::{GeocodeCache, GeocodeCacheKey},
    directions::get_ok_body,
    error::ProviderError,
    geo_point::GeoPoint,
    profile::ProviderKind,
};

pub const MAPBOX_GEOCODING_PATH: &str = "/geocoding/v5/mapbox.places";

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    /// `[lon, lat]`
    center: [f64; 2],
}

pub struct MapboxGeocoderParams {
    pub access_token: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("invalid geocoding base URL \"{0}\"")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Forward geocoding of free text, first match only.
pub struct MapboxGeocoder {
    client: reqwest::Client,
    access_token: Option<String>,
    endpoint: reqwest::Url,
    cache: GeocodeCache,
}

impl MapboxGeocoder {
    pub fn new(params: MapboxGeocoderParams, cache: GeocodeCache) -> Result<Self, GeocoderError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Self::with_client(client, params.access_token, &params.base_url, cache)
    }

    /// Fails when `base_url` cannot carry the query as a path segment.
    pub fn with_client(
        client: reqwest::Client,
        access_token: Option<String>,
        base_url: &str,
        cache: GeocodeCache,
    ) -> Result<Self, GeocoderError> {
        let endpoint = reqwest::Url::parse(&format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            MAPBOX_GEOCODING_PATH
        ))
        .ok()
        .filter(|url| !url.cannot_be_a_base())
        .ok_or_else(|| GeocoderError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            access_token: access_token.filter(|token| !token.trim().is_empty()),
            endpoint,
            cache,
        })
    }

    fn lookup_url(&self, query: &str) -> reqwest::Url {
        let mut url = self.endpoint.clone();
        // endpoint is a base URL, checked in with_client
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&format!("{query}.json"));
        }
        url
    }

    /// Coordinates of the best match for `query`, `None` when nothing matched.
    /// `proximity` biases results towards a point.
    pub async fn geocode(
        &self,
        query: &str,
        proximity: Option<GeoPoint>,
    ) -> Result<Option<GeoPoint>, ProviderError> {
        let key = GeocodeCacheKey::new(query, proximity);
        if let Some(found) = self.cache.get(&key) {
            debug!("Geocoding: cache hit for \"{}\"", query.trim());
            return Ok(found);
        }

        let Some(access_token) = self.access_token.as_deref() else {
            return Err(ProviderError::MissingCredential);
        };

        let url = self.lookup_url(query.trim());

        let mut params = vec![
            ("access_token", access_token.to_string()),
            ("limit", "1".to_string()),
        ];
        if let Some(point) = proximity {
            params.push(("proximity", point.to_lon_lat()));
        }

        debug!("Geocoding: looking up \"{}\"", query.trim());

        let body = get_ok_body(self.client.get(url).query(&params), ProviderKind::Mapbox).await?;
        let response: GeocodingResponse = serde_json::from_str(&body)?;

        let found = response
            .features
            .first()
            .map(|feature| GeoPoint::from_lon_lat(feature.center));

        self.cache.insert(key, found);

        Ok(found)
    }
}
