use std::path::Path;

use geojson::{
    Feature, FeatureCollection, GeoJson, Geometry,
    Value::{LineString, Point},
};
use lastmile_comparison::{
    places::ApartmentSite, scenario::ComparisonReport, synthetic::DecorativeMarker,
};
use lastmile_providers::geo_point::GeoPoint;
use serde_json::json;

fn feature(geometry: geojson::Value, properties: serde_json::Value) -> Feature {
    Feature {
        geometry: Some(Geometry::new(geometry)),
        properties: properties.as_object().cloned(),
        id: None,
        bbox: None,
        foreign_members: None,
    }
}

fn point(position: GeoPoint, properties: serde_json::Value) -> Feature {
    feature(Point(vec![position.lon, position.lat]), properties)
}

/// Routes, endpoints, safety markers and decorative markers of one
/// comparison as a single feature collection.
pub fn report_to_geojson(
    report: &ComparisonReport,
    apartment: &ApartmentSite,
    decorative: &[DecorativeMarker],
) -> GeoJson {
    let mut features = Vec::new();

    for leg in report.legs() {
        let Some(resolved) = &leg.resolved else {
            continue;
        };

        let coordinates = resolved
            .route
            .geometry
            .iter()
            .map(|point| vec![point.lon, point.lat])
            .collect();

        features.push(feature(
            LineString(coordinates),
            json!({
                "kind": "route",
                "plan": leg.plan,
                "role": leg.role,
                "profile": leg.profile,
                "provider": resolved.provider,
                "distance_km": resolved.route.distance_km,
                "duration_min": resolved.route.duration_min,
            }),
        ));
    }

    features.push(point(
        report.gate,
        json!({ "kind": "gate", "approximated": report.approximated }),
    ));
    features.push(point(report.front, json!({ "kind": "front" })));

    for hydrant in &apartment.hydrants {
        features.push(point(*hydrant, json!({ "kind": "hydrant" })));
    }
    for fire_lane in &apartment.fire_lanes {
        features.push(point(*fire_lane, json!({ "kind": "fire_lane" })));
    }

    for marker in decorative {
        features.push(feature(
            Point(vec![marker.lon(), marker.lat()]),
            json!({ "kind": "decorative" }),
        ));
    }

    GeoJson::FeatureCollection(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn write_geojson(path: &Path, geojson: &GeoJson) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, geojson.to_string())?;

    Ok(())
}
