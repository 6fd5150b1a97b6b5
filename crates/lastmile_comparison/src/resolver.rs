use std::future::Future;

use fxhash::FxHashMap;
use lastmile_providers::{error::ProviderError, geo_point::GeoPoint, geocoding::MapboxGeocoder};
use thiserror::Error;

use crate::places::PlaceCatalog;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("unknown place \"{0}\"")]
    UnknownPlace(String),

    #[error("no match for \"{0}\"")]
    Unresolved(String),

    #[error("geocoding failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Turns a place name into a coordinate.
pub trait PlaceResolver: Send + Sync {
    fn resolve(&self, name: &str) -> impl Future<Output = Result<GeoPoint, ResolveError>> + Send;
}

/// Fixed name to coordinate table. Unknown names are an error, never a default.
#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    entries: FxHashMap<String, GeoPoint>,
}

impl StaticTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, point: GeoPoint) {
        self.entries.insert(name.into(), point);
    }

    pub fn lookup(&self, name: &str) -> Result<GeoPoint, ResolveError> {
        self.entries
            .get(name.trim())
            .copied()
            .ok_or_else(|| ResolveError::UnknownPlace(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&PlaceCatalog> for StaticTable {
    /// Origins by name, complexes by name (their building front).
    fn from(catalog: &PlaceCatalog) -> Self {
        let mut table = StaticTable::new();

        for origin in &catalog.origins {
            table.insert(origin.name.clone(), origin.position);
        }
        for apartment in &catalog.apartments {
            table.insert(apartment.name.clone(), apartment.front);
        }

        table
    }
}

impl PlaceResolver for StaticTable {
    async fn resolve(&self, name: &str) -> Result<GeoPoint, ResolveError> {
        self.lookup(name)
    }
}

/// Free-text lookup through the geocoding provider, optionally biased
/// towards a point.
pub struct GeocodingResolver<'a> {
    geocoder: &'a MapboxGeocoder,
    proximity: Option<GeoPoint>,
}

impl<'a> GeocodingResolver<'a> {
    pub fn new(geocoder: &'a MapboxGeocoder) -> Self {
        Self {
            geocoder,
            proximity: None,
        }
    }

    pub fn near(mut self, point: GeoPoint) -> Self {
        self.proximity = Some(point);
        self
    }
}

impl PlaceResolver for GeocodingResolver<'_> {
    async fn resolve(&self, name: &str) -> Result<GeoPoint, ResolveError> {
        self.geocoder
            .geocode(name, self.proximity)
            .await?
            .ok_or_else(|| ResolveError::Unresolved(name.to_string()))
    }
}
