use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Travel mode of a route request.
#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Driving,
    Walking,
}

/// External directions providers, in fallback priority order.
#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Mapbox,
    Osrm,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown profile \"{0}\", expected \"driving\" or \"walking\"")]
pub struct UnknownProfile(pub String);

impl ProviderKind {
    /// Identifier the provider expects in the request path for `profile`.
    ///
    /// The public OSRM server names the walking profile `foot`.
    pub const fn profile_id(self, profile: Profile) -> &'static str {
        match (self, profile) {
            (ProviderKind::Mapbox, Profile::Driving) => "driving",
            (ProviderKind::Mapbox, Profile::Walking) => "walking",
            (ProviderKind::Osrm, Profile::Driving) => "driving",
            (ProviderKind::Osrm, Profile::Walking) => "foot",
        }
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Profile::Driving => "driving",
                Profile::Walking => "walking",
            }
        )
    }
}

impl FromStr for Profile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(Profile::Driving),
            "walking" => Ok(Profile::Walking),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProviderKind::Mapbox => "mapbox",
                ProviderKind::Osrm => "osrm",
            }
        )
    }
}
