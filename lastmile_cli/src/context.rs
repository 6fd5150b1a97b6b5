use std::{path::Path, time::Duration};

use anyhow::Context;
use lastmile_comparison::places::PlaceCatalog;
use lastmile_providers::{
    cache::Caches,
    config::LastmileConfig,
    geocoding::{MapboxGeocoder, MapboxGeocoderParams},
    route_client::DefaultRouteClient,
};

/// Configuration, catalog and clients shared by every command.
pub struct AppContext {
    pub config: LastmileConfig,
    pub catalog: PlaceCatalog,
    pub caches: Caches,
    pub routes: DefaultRouteClient,
    pub geocoder: MapboxGeocoder,
}

pub struct Overrides {
    pub timeout: Option<Duration>,
    pub route_ttl: Option<Duration>,
}

impl AppContext {
    pub fn new(mut config: LastmileConfig, catalog: PlaceCatalog, overrides: Overrides) -> anyhow::Result<Self> {
        if let Some(timeout) = overrides.timeout {
            anyhow::ensure!(!timeout.is_zero(), "--timeout must be greater than zero");
            config.request_timeout = timeout;
        }
        if let Some(route_ttl) = overrides.route_ttl {
            config.route_ttl = route_ttl;
        }

        let caches = Caches::new(config.route_ttl, config.geocode_ttl);
        let routes = DefaultRouteClient::from_config(&config, &caches)
            .context("failed to build the directions clients")?;
        let geocoder = MapboxGeocoder::new(
            MapboxGeocoderParams {
                access_token: config.mapbox_token.clone(),
                base_url: config.mapbox_url.clone(),
                timeout: config.request_timeout,
            },
            caches.geocodes.clone(),
        )
        .context("failed to build the geocoding client")?;

        Ok(Self {
            config,
            catalog,
            caches,
            routes,
            geocoder,
        })
    }

    /// One line describing the credential and providers in use.
    pub fn status_line(&self) -> String {
        match self.config.masked_token() {
            Some(masked) => format!(
                "Mapbox token {masked}, falling back to OSRM at {}",
                self.config.osrm_url
            ),
            None => format!(
                "No Mapbox token, routing through OSRM at {}",
                self.config.osrm_url
            ),
        }
    }
}

pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<PlaceCatalog> {
    match path {
        Some(path) => PlaceCatalog::from_json_file(path)
            .with_context(|| format!("cannot load catalog {}", path.display())),
        None => Ok(PlaceCatalog::hanam()),
    }
}
