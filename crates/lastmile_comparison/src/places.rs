use std::{fs::File, io::BufReader, path::Path};

use fxhash::FxHashSet;
use lastmile_providers::geo_point::GeoPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::ResolveError;

/// Where an emergency vehicle is dispatched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub name: String,
    pub position: GeoPoint,
}

/// An apartment complex: the gate vehicles stop at today, and the building
/// front they could reach directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentSite {
    pub name: String,

    /// Map centering hint, never routed to.
    pub center: GeoPoint,

    #[serde(default)]
    pub gate: Option<GeoPoint>,

    pub front: GeoPoint,

    #[serde(default)]
    pub hydrants: Vec<GeoPoint>,

    #[serde(default)]
    pub fire_lanes: Vec<GeoPoint>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog has no {0}")]
    Empty(&'static str),

    #[error("\"{0}\" appears more than once in the catalog")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCatalog {
    pub origins: Vec<Origin>,
    pub apartments: Vec<ApartmentSite>,
}

impl PlaceCatalog {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog: PlaceCatalog = serde_json::from_reader(BufReader::new(file))?;
        catalog.validate()?;

        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.origins.is_empty() {
            return Err(CatalogError::Empty("origins"));
        }
        if self.apartments.is_empty() {
            return Err(CatalogError::Empty("apartments"));
        }

        let mut seen = FxHashSet::default();
        let names = self
            .origins
            .iter()
            .map(|origin| &origin.name)
            .chain(self.apartments.iter().map(|apartment| &apartment.name));

        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(CatalogError::DuplicateName(name.clone()));
            }
        }

        Ok(())
    }

    pub fn origin(&self, name: &str) -> Result<&Origin, ResolveError> {
        self.origins
            .iter()
            .find(|origin| origin.name == name.trim())
            .ok_or_else(|| ResolveError::UnknownPlace(name.to_string()))
    }

    pub fn apartment(&self, name: &str) -> Result<&ApartmentSite, ResolveError> {
        self.apartments
            .iter()
            .find(|apartment| apartment.name == name.trim())
            .ok_or_else(|| ResolveError::UnknownPlace(name.to_string()))
    }

    /// Dispatch points of Hanam fire station and the Misa riverside complexes.
    pub fn hanam() -> Self {
        let p = GeoPoint::new;

        Self {
            origins: vec![
                Origin {
                    name: "하남소방서".to_string(),
                    position: p(37.539826, 127.220661),
                },
                Origin {
                    name: "미사강변119안전센터".to_string(),
                    position: p(37.566902, 127.185298),
                },
            ],
            apartments: vec![
                ApartmentSite {
                    name: "미사강변센트럴풍경채".to_string(),
                    center: p(37.556591, 127.183081),
                    gate: Some(p(37.556844, 127.181887)),
                    front: p(37.557088, 127.183036),
                    hydrants: vec![
                        p(37.55695, 127.18220),
                        p(37.55702, 127.18255),
                        p(37.55706, 127.18285),
                        p(37.55710, 127.18305),
                    ],
                    fire_lanes: vec![
                        p(37.55712, 127.18302),
                        p(37.55692, 127.18298),
                        p(37.55698, 127.18322),
                    ],
                },
                ApartmentSite {
                    name: "미사강변 푸르지오".to_string(),
                    center: p(37.564925, 127.184055),
                    gate: Some(p(37.565196, 127.182840)),
                    front: p(37.566168, 127.182795),
                    hydrants: vec![
                        p(37.56530, 127.18310),
                        p(37.56560, 127.18305),
                        p(37.56590, 127.18295),
                        p(37.56610, 127.18285),
                    ],
                    fire_lanes: vec![
                        p(37.56605, 127.18280),
                        p(37.56585, 127.18315),
                        p(37.56555, 127.18320),
                    ],
                },
                ApartmentSite {
                    name: "미사강변 리슈빌".to_string(),
                    center: p(37.572842, 127.180515),
                    gate: Some(p(37.573449, 127.181672)),
                    front: p(37.573080, 127.180428),
                    hydrants: vec![
                        p(37.57320, 127.18110),
                        p(37.57318, 127.18085),
                        p(37.57312, 127.18065),
                        p(37.57308, 127.18050),
                    ],
                    fire_lanes: vec![
                        p(37.57310, 127.18040),
                        p(37.57325, 127.18070),
                        p(37.57300, 127.18080),
                    ],
                },
                ApartmentSite {
                    name: "미사강변 센트리버".to_string(),
                    center: p(37.573741, 127.183326),
                    gate: Some(p(37.573164, 127.181960)),
                    front: p(37.573263, 127.183110),
                    hydrants: vec![
                        p(37.57325, 127.18230),
                        p(37.57330, 127.18270),
                        p(37.57332, 127.18295),
                        p(37.57330, 127.18315),
                    ],
                    fire_lanes: vec![
                        p(37.57327, 127.18308),
                        p(37.57315, 127.18285),
                        p(37.57340, 127.18290),
                    ],
                },
                ApartmentSite {
                    name: "미사강변 한신휴플리스".to_string(),
                    center: p(37.573769, 127.191912),
                    gate: Some(p(37.572975, 127.192083)),
                    front: p(37.573456, 127.191935),
                    hydrants: vec![
                        p(37.57315, 127.19205),
                        p(37.57330, 127.19200),
                        p(37.57355, 127.19198),
                        p(37.57370, 127.19195),
                    ],
                    fire_lanes: vec![
                        p(37.57346, 127.19190),
                        p(37.57332, 127.19182),
                        p(37.57362, 127.19188),
                    ],
                },
            ],
        }
    }
}

impl Default for PlaceCatalog {
    fn default() -> Self {
        Self::hanam()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hanam_catalog_is_valid() {
        let catalog = PlaceCatalog::hanam();
        catalog.validate().unwrap();

        assert_eq!(catalog.origins.len(), 2);
        assert_eq!(catalog.apartments.len(), 5);
        assert!(catalog.apartments.iter().all(|apartment| apartment.gate.is_some()));
    }

    #[test]
    fn test_lookup() {
        let catalog = PlaceCatalog::hanam();

        assert_eq!(
            catalog.origin("하남소방서").unwrap().position,
            GeoPoint::new(37.539826, 127.220661)
        );
        assert_eq!(
            catalog.apartment(" 미사강변센트럴풍경채 ").unwrap().front,
            GeoPoint::new(37.557088, 127.183036)
        );
        assert_eq!(
            catalog.origin("서울소방서"),
            Err(ResolveError::UnknownPlace("서울소방서".to_string()))
        );
    }

    #[test]
    fn test_catalog_json_with_missing_gate() {
        let json = r#"{
            "origins": [{"name": "station", "position": {"lat": 37.5, "lon": 127.2}}],
            "apartments": [{
                "name": "complex",
                "center": {"lat": 37.55, "lon": 127.18},
                "front": {"lat": 37.551, "lon": 127.181}
            }]
        }"#;

        let catalog: PlaceCatalog = serde_json::from_str(json).unwrap();
        catalog.validate().unwrap();

        let apartment = catalog.apartment("complex").unwrap();
        assert_eq!(apartment.gate, None);
        assert!(apartment.hydrants.is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty() {
        let mut catalog = PlaceCatalog::hanam();
        catalog.origins.push(catalog.origins[0].clone());
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateName(name)) if name == "하남소방서"
        ));

        let mut catalog = PlaceCatalog::hanam();
        catalog.apartments.clear();
        assert!(matches!(catalog.validate(), Err(CatalogError::Empty("apartments"))));
    }
}
