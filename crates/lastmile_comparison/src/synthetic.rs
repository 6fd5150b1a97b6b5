use geo::{Destination, Haversine, Point};
use lastmile_providers::geo_point::GeoPoint;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

/// A scattered map decoration. It has no conversion into a
/// [`GeoPoint`] and never feeds a route query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecorativeMarker {
    lat: f64,
    lon: f64,
}

impl DecorativeMarker {
    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// `count` markers spread uniformly over the disc of `radius_m` meters
/// around `center`. The same seed always yields the same markers.
pub fn scatter_markers(
    center: GeoPoint,
    count: usize,
    radius_m: f64,
    seed: u64,
) -> Vec<DecorativeMarker> {
    let mut rng = StdRng::seed_from_u64(seed);
    let origin = Point::from(center);
    let radius_m = radius_m.max(0.0);

    (0..count)
        .map(|_| {
            let bearing = rng.random_range(0.0..360.0);
            // sqrt keeps the density uniform over the area
            let distance = radius_m * rng.random::<f64>().sqrt();

            let point = Haversine.destination(origin, bearing, distance);

            DecorativeMarker {
                lat: point.y(),
                lon: point.x(),
            }
        })
        .collect()
}
