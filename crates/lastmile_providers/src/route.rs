use serde::Serialize;
use thiserror::Error;

use crate::{error::ProviderError, geo_point::GeoPoint, profile::Profile};

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("a route needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("points {index} and {} are identical ({point})", .index + 1)]
    DuplicateConsecutive { index: usize, point: GeoPoint },
}

/// A single directions request: origin first, then every stop in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQuery {
    points: Vec<GeoPoint>,
    profile: Profile,
}

impl RouteQuery {
    pub fn new(points: Vec<GeoPoint>, profile: Profile) -> Result<Self, QueryError> {
        if points.len() < 2 {
            return Err(QueryError::TooFewPoints(points.len()));
        }

        if let Some(index) = points.windows(2).position(|pair| pair[0] == pair[1]) {
            return Err(QueryError::DuplicateConsecutive {
                index,
                point: points[index],
            });
        }

        Ok(Self { points, profile })
    }

    pub fn between(from: GeoPoint, to: GeoPoint, profile: Profile) -> Result<Self, QueryError> {
        Self::new(vec![from, to], profile)
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn origin(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn destination(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// `lon,lat;lon,lat;...` path segment shared by every provider.
    pub fn coordinates_path(&self) -> String {
        let mut path = String::new();

        for (i, point) in self.points.iter().enumerate() {
            path.push_str(&point.to_lon_lat());

            if i < self.points.len() - 1 {
                path.push(';');
            }
        }

        path
    }
}

/// A normalized route: kilometers and minutes, polyline latitude first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub geometry: Vec<GeoPoint>,
    pub distance_km: f64,
    pub duration_min: f64,
}

impl Route {
    pub fn from_meters_seconds(geometry: Vec<GeoPoint>, meters: f64, seconds: f64) -> Self {
        Self {
            geometry,
            distance_km: meters / 1000.0,
            duration_min: seconds / 60.0,
        }
    }

    pub fn end(&self) -> Option<GeoPoint> {
        self.geometry.last().copied()
    }
}

pub type RouteResult = Result<Route, ProviderError>;
