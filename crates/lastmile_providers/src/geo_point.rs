use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 position in degrees, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum GeoPointParseError {
    #[error("expected \"lat,lon\", got \"{0}\"")]
    Format(String),

    #[error("invalid coordinate value \"{0}\"")]
    Number(String),

    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    OutOfRange { lat: f64, lon: f64 },
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Providers take coordinates as `lon,lat`.
    pub fn to_lon_lat(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }

    pub fn from_lon_lat(lon_lat: [f64; 2]) -> Self {
        Self {
            lat: lon_lat[1],
            lon: lon_lat[0],
        }
    }

    /// Exact bit pattern, used for hashing cache keys.
    pub fn to_bits(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

impl FromStr for GeoPoint {
    type Err = GeoPointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| GeoPointParseError::Format(s.to_string()))?;

        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| GeoPointParseError::Number(value.trim().to_string()))
        };

        let lat = parse(lat)?;
        let lon = parse(lon)?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoPointParseError::OutOfRange { lat, lon });
        }

        Ok(GeoPoint::new(lat, lon))
    }
}

impl From<&GeoPoint> for geo_types::Point {
    fn from(point: &GeoPoint) -> Self {
        geo_types::Point::new(point.lon, point.lat)
    }
}

impl From<GeoPoint> for geo_types::Point {
    fn from(point: GeoPoint) -> Self {
        geo_types::Point::new(point.lon, point.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let point: GeoPoint = "37.539826, 127.220661".parse().unwrap();
        assert_eq!(point, GeoPoint::new(37.539826, 127.220661));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "37.5".parse::<GeoPoint>(),
            Err(GeoPointParseError::Format(_))
        ));
        assert!(matches!(
            "north,127.2".parse::<GeoPoint>(),
            Err(GeoPointParseError::Number(_))
        ));
        assert!(matches!(
            "127.2,37.5".parse::<GeoPoint>(),
            Err(GeoPointParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_lon_lat_order() {
        let point = GeoPoint::new(37.556844, 127.181887);
        assert_eq!(point.to_lon_lat(), "127.181887,37.556844");
        assert_eq!(GeoPoint::from_lon_lat([127.181887, 37.556844]), point);

        let geo: geo_types::Point = point.into();
        assert_eq!(geo.x(), 127.181887);
        assert_eq!(geo.y(), 37.556844);
    }
}
